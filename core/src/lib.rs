#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Noise Identification module.
//!
//! This crate defines the message surface that connects host adapters, the
//! authoritative module state, and pure systems. Adapters submit [`Command`]
//! values describing player input or elapsed time, the module executes them
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems and the [`Host`] capability to react to.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Human-readable module name used to tag diagnostic output.
pub const MODULE_NAME: &str = "Noise Identification";

/// Number of stages a player must clear to solve the module.
pub const STAGE_COUNT: usize = 3;

/// Number of texture variants available for every category.
pub const TEXTURE_VARIANTS_PER_CATEGORY: usize = 5;

/// Strength of the interaction pulse emitted on every accepted button press.
///
/// The buttons are small, so the pulse stays well below a full-strength punch.
pub const INTERACTION_PULSE_STRENGTH: f32 = 0.7;

/// Noise category that a player must identify from the displayed sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Cellular crystal-like noise.
    Crystal,
    /// Flowing, domain-warped noise.
    Liquid,
    /// Speckled moisture noise.
    Moisture,
    /// Smooth gradient (Perlin) noise.
    Perlin,
    /// Cell-distance (Voronoi) noise.
    Voronoi,
    /// Uncorrelated white noise.
    White,
}

impl Category {
    /// Number of categories in the closed set.
    pub const COUNT: usize = 6;

    /// Every category ordered by ordinal.
    pub const ALL: [Category; Category::COUNT] = [
        Self::Crystal,
        Self::Liquid,
        Self::Moisture,
        Self::Perlin,
        Self::Voronoi,
        Self::White,
    ];

    /// Stable zero-based ordinal of the category.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Self::Crystal => 0,
            Self::Liquid => 1,
            Self::Moisture => 2,
            Self::Perlin => 3,
            Self::Voronoi => 4,
            Self::White => 5,
        }
    }

    /// Resolves the category with the provided ordinal, if any.
    #[must_use]
    pub const fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal < Self::COUNT {
            Some(Self::ALL[ordinal])
        } else {
            None
        }
    }

    /// Canonical display name of the category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Crystal => "Crystal",
            Self::Liquid => "Liquid",
            Self::Moisture => "Moisture",
            Self::Perlin => "Perlin",
            Self::Voronoi => "Voronoi",
            Self::White => "White",
        }
    }

    /// Resolves a category from its canonical name. Matching is exact.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of one of the six physical buttons on the module face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(u8);

impl ButtonId {
    /// Creates a new button identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Identifier of the button labelled with the provided category.
    #[must_use]
    pub const fn for_category(category: Category) -> Self {
        Self(category.ordinal() as u8)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Category printed on the button, or `None` for identifiers that do not
    /// correspond to a button on the module.
    #[must_use]
    pub const fn category(&self) -> Option<Category> {
        Category::from_ordinal(self.0 as usize)
    }
}

impl From<Category> for ButtonId {
    fn from(category: Category) -> Self {
        Self::for_category(category)
    }
}

/// Unique identifier assigned to a module instance for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u32);

impl ModuleId {
    /// Creates a new module identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{MODULE_NAME} #{}]", self.0)
    }
}

/// One of the three sequential rounds within a module instance.
///
/// Each stage also owns the status LED that lights up once it is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Opening stage.
    First,
    /// Middle stage.
    Second,
    /// Final stage.
    Third,
}

impl Stage {
    /// Every stage in play order.
    pub const ALL: [Stage; STAGE_COUNT] = [Self::First, Self::Second, Self::Third];

    /// One-based stage number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    /// Resolves the stage with the provided one-based number, if any.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    /// Zero-based index of the stage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.number() as usize - 1
    }
}

/// Ordered categories the player must identify, one per stage.
///
/// Generated once when the module initialises and immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageAssignment {
    stages: [Category; STAGE_COUNT],
}

impl StageAssignment {
    /// Creates an assignment from explicit per-stage categories.
    #[must_use]
    pub const fn new(first: Category, second: Category, third: Category) -> Self {
        Self {
            stages: [first, second, third],
        }
    }

    /// Category assigned to the provided stage.
    #[must_use]
    pub const fn category(&self, stage: Stage) -> Category {
        self.stages[stage.index()]
    }

    /// Category assigned to stage one.
    #[must_use]
    pub const fn first(&self) -> Category {
        self.stages[0]
    }

    /// Category assigned to stage two.
    #[must_use]
    pub const fn second(&self) -> Category {
        self.stages[1]
    }

    /// Category assigned to stage three.
    #[must_use]
    pub const fn third(&self) -> Category {
        self.stages[2]
    }

    /// Iterator over the stage categories in play order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.stages.iter().copied()
    }

    /// Reports whether no stage repeats the category of the stage right before it.
    ///
    /// Stage three matching stage one is permitted.
    #[must_use]
    pub fn avoids_immediate_repeats(&self) -> bool {
        self.stages.windows(2).all(|pair| pair[0] != pair[1])
    }
}

/// Result of routing a button press through the module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PressOutcome {
    /// The press was discarded without any effect.
    Ignored,
    /// The press matched the expected category and advanced the module.
    Correct,
    /// The press did not match the expected category and caused a strike.
    Incorrect,
}

/// Commands that express all permissible module mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Reports that the player pressed one of the module's buttons.
    PressButton {
        /// Button that was pressed.
        button: ButtonId,
    },
    /// Advances the presentation clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the module after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the presentation clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces the stage categories generated for a freshly initialised module.
    ModuleInitialized {
        /// Identifier of the module instance.
        module: ModuleId,
        /// Categories assigned to the three stages.
        assignment: StageAssignment,
    },
    /// Requests that the display immediately show a sample of the category.
    DisplayShown {
        /// Category whose texture should be applied.
        category: Category,
    },
    /// Confirms that a button press was accepted for judging.
    ///
    /// Hosts answer with an interaction pulse and a confirmation sound.
    ButtonPressed {
        /// Button that was pressed.
        button: ButtonId,
    },
    /// Confirms that the player cleared a stage and a new one began.
    StageAdvanced {
        /// Stage that became active.
        stage: Stage,
        /// Category the player must now identify.
        expected: Category,
    },
    /// Requests that the display hide and then reveal a new sample.
    DisplayRevealRequested {
        /// Category whose texture should be revealed.
        category: Category,
    },
    /// Requests that the status LED belonging to a stage light up.
    StageLedLit {
        /// Stage whose LED turns on.
        stage: Stage,
    },
    /// Requests that the display collapse and stay hidden.
    DisplayCollapsed,
    /// Reports that a press did not match the expected category.
    StrikeSignalled {
        /// Category the module expected.
        expected: Category,
        /// Category of the pressed button.
        received: Category,
    },
    /// Reports that the module has been solved.
    PassSignalled,
    /// Reports that the stage tracker reached an impossible stage counter and
    /// forced a solve to keep the module completable.
    FaultRecovered {
        /// Stage counter observed when the fault was detected.
        stage_number: u8,
    },
}

/// Capabilities the enclosing game exposes to the module.
///
/// All calls are fire-and-forget notifications; the module never consumes a
/// return value.
pub trait Host {
    /// Penalises the player for an incorrect press.
    fn signal_strike(&mut self);

    /// Reports that the module has been solved.
    fn signal_pass(&mut self);

    /// Plays the short button confirmation sound at the pressed button.
    fn play_confirmation_sound(&mut self, button: ButtonId);

    /// Emits a haptic/interaction pulse with the provided strength.
    fn pulse(&mut self, strength: f32);
}

/// Opaque identifier of a visual asset applied to the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(u32);

impl TextureId {
    /// Creates a new texture identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Fixed lookup table mapping each category to its pool of texture variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureTable {
    variants: [[TextureId; TEXTURE_VARIANTS_PER_CATEGORY]; Category::COUNT],
}

impl TextureTable {
    /// Creates a table from explicit per-category variant pools, indexed by
    /// category ordinal.
    #[must_use]
    pub const fn new(
        variants: [[TextureId; TEXTURE_VARIANTS_PER_CATEGORY]; Category::COUNT],
    ) -> Self {
        Self { variants }
    }

    /// Texture variants available for the provided category.
    #[must_use]
    pub fn variants(&self, category: Category) -> &[TextureId; TEXTURE_VARIANTS_PER_CATEGORY] {
        &self.variants[category.ordinal()]
    }

    /// Looks up a single variant of the provided category.
    #[must_use]
    pub fn variant(&self, category: Category, index: usize) -> Option<TextureId> {
        self.variants(category).get(index).copied()
    }
}

impl Default for TextureTable {
    /// Lays the textures out contiguously: category `c` owns the identifiers
    /// `c * 5 .. c * 5 + 5`.
    fn default() -> Self {
        let mut variants = [[TextureId::new(0); TEXTURE_VARIANTS_PER_CATEGORY]; Category::COUNT];
        for (ordinal, pool) in variants.iter_mut().enumerate() {
            for (variant, texture) in pool.iter_mut().enumerate() {
                let index = ordinal * TEXTURE_VARIANTS_PER_CATEGORY + variant;
                *texture = TextureId::new(index as u32);
            }
        }
        Self { variants }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ButtonId, Category, ModuleId, Stage, StageAssignment, TextureId, TextureTable,
        TEXTURE_VARIANTS_PER_CATEGORY,
    };

    #[test]
    fn ordinals_match_declaration_order() {
        for (index, category) in Category::ALL.into_iter().enumerate() {
            assert_eq!(category.ordinal(), index);
            assert_eq!(Category::from_ordinal(index), Some(category));
        }
        assert_eq!(Category::from_ordinal(Category::COUNT), None);
    }

    #[test]
    fn category_names_resolve_exactly() {
        assert_eq!(Category::from_name("Voronoi"), Some(Category::Voronoi));
        assert_eq!(Category::from_name("voronoi"), None);
        assert_eq!(Category::White.to_string(), "White");
    }

    #[test]
    fn buttons_map_onto_categories() {
        assert_eq!(
            ButtonId::for_category(Category::Perlin).category(),
            Some(Category::Perlin)
        );
        assert_eq!(ButtonId::new(6).category(), None);
        assert_eq!(ButtonId::from(Category::Crystal), ButtonId::new(0));
    }

    #[test]
    fn module_id_formats_as_log_tag() {
        assert_eq!(ModuleId::new(7).to_string(), "[Noise Identification #7]");
    }

    #[test]
    fn stages_round_trip_through_numbers() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_number(stage.number()), Some(stage));
        }
        assert_eq!(Stage::from_number(0), None);
        assert_eq!(Stage::from_number(4), None);
    }

    #[test]
    fn assignment_allows_first_and_third_to_match() {
        let assignment = StageAssignment::new(Category::Liquid, Category::White, Category::Liquid);
        assert!(assignment.avoids_immediate_repeats());
        assert_eq!(assignment.category(Stage::Third), Category::Liquid);
    }

    #[test]
    fn assignment_rejects_adjacent_repeats() {
        let assignment = StageAssignment::new(Category::Liquid, Category::White, Category::White);
        assert!(!assignment.avoids_immediate_repeats());
    }

    #[test]
    fn assignment_round_trips_through_bincode() {
        let assignment =
            StageAssignment::new(Category::Crystal, Category::Moisture, Category::Crystal);
        let bytes = bincode::serialize(&assignment).expect("serialize");
        let restored: StageAssignment = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, assignment);
    }

    #[test]
    fn default_texture_table_uses_contiguous_pools() {
        let table = TextureTable::default();
        assert_eq!(table.variant(Category::Crystal, 0), Some(TextureId::new(0)));
        assert_eq!(table.variant(Category::Liquid, 0), Some(TextureId::new(5)));
        assert_eq!(table.variant(Category::White, 4), Some(TextureId::new(29)));
        assert_eq!(
            table.variant(Category::White, TEXTURE_VARIANTS_PER_CATEGORY),
            None
        );
    }
}
