#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative state management for a Noise Identification module.
//!
//! A [`NoiseModule`] owns the generated stage assignment and the stage
//! tracker. Adapters mutate it exclusively through [`apply`] (or the
//! [`press`] convenience wrapper) and read it through [`query`]. Signals
//! destined for the enclosing game are emitted as events and routed to a
//! [`Host`] implementation by [`deliver`].

pub mod tracker;

use noise_identification_core::{
    ButtonId, Command, Event, Host, ModuleId, PressOutcome, Stage, StageAssignment,
    INTERACTION_PULSE_STRENGTH,
};
use noise_identification_system_sequence::SequenceGenerator;
use rand::Rng;
use tracing::{error, info, warn};

use crate::tracker::{StageTracker, Transition, SOLVED_STAGE_NUMBER};

/// Hands out sequential module identifiers starting at one.
#[derive(Debug)]
pub struct ModuleIdAllocator {
    next: u32,
}

impl Default for ModuleIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl ModuleIdAllocator {
    /// Creates an allocator whose first identifier is one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next identifier.
    pub fn allocate(&mut self) -> ModuleId {
        let id = ModuleId::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Represents the authoritative state of a single module instance.
#[derive(Clone, Debug)]
pub struct NoiseModule {
    id: ModuleId,
    tracker: StageTracker,
    solved: bool,
}

impl NoiseModule {
    /// Initialises a module with a freshly generated stage assignment.
    ///
    /// Emits the initialisation announcement and the request to show the
    /// first stage's sample.
    pub fn initialize<R: Rng>(
        id: ModuleId,
        generator: &mut SequenceGenerator<R>,
        out_events: &mut Vec<Event>,
    ) -> Self {
        Self::with_assignment(id, generator.generate(), out_events)
    }

    /// Initialises a module with a predetermined stage assignment.
    pub fn with_assignment(
        id: ModuleId,
        assignment: StageAssignment,
        out_events: &mut Vec<Event>,
    ) -> Self {
        info!("{id} Initialization finished.");
        for (stage, category) in Stage::ALL.into_iter().zip(assignment.iter()) {
            info!("{id} Stage {} will be of type {category}.", stage.number());
        }

        out_events.push(Event::ModuleInitialized {
            module: id,
            assignment,
        });
        out_events.push(Event::DisplayShown {
            category: assignment.first(),
        });

        Self {
            id,
            tracker: StageTracker::new(assignment),
            solved: false,
        }
    }

    /// Restores a module at an arbitrary stage counter without emitting events.
    ///
    /// A counter equal to [`SOLVED_STAGE_NUMBER`] restores a solved module.
    #[must_use]
    pub fn resume(id: ModuleId, assignment: StageAssignment, stage_number: u8) -> Self {
        Self {
            id,
            tracker: StageTracker::resume(assignment, stage_number),
            solved: stage_number == SOLVED_STAGE_NUMBER,
        }
    }

    fn complete(&mut self, out_events: &mut Vec<Event>) {
        out_events.push(Event::DisplayCollapsed);
        self.solved = true;
        info!("{} Module Solved.", self.id);
        out_events.push(Event::PassSignalled);
    }
}

/// Applies the provided command to the module.
pub fn apply(module: &mut NoiseModule, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PressButton { button } => {
            let _ = press_button(module, button, out_events);
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
        }
    }
}

/// Judges a button press against the expected category.
///
/// Presses on a solved module and presses of buttons that do not exist are
/// ignored without emitting anything. Every other press first emits
/// [`Event::ButtonPressed`], whether or not it turns out to be correct.
pub fn press_button(
    module: &mut NoiseModule,
    button: ButtonId,
    out_events: &mut Vec<Event>,
) -> PressOutcome {
    if module.solved {
        return PressOutcome::Ignored;
    }

    let id = module.id;
    let Some(received) = button.category() else {
        warn!("{id} Ignoring press of unknown button {}.", button.get());
        return PressOutcome::Ignored;
    };

    out_events.push(Event::ButtonPressed { button });

    let expected = module.tracker.expected();
    if received != expected {
        warn!(
            "{id} !!STRIKE!! Expected Type {expected}. You pressed Button Type {received}. That was incorrect."
        );
        out_events.push(Event::StrikeSignalled { expected, received });
        return PressOutcome::Incorrect;
    }

    info!("{id} Expected Type {expected}. You pressed Button Type {received}. That was correct.");

    match module.tracker.advance() {
        Transition::Advanced {
            cleared,
            stage,
            expected,
        } => {
            out_events.push(Event::StageLedLit { stage: cleared });
            out_events.push(Event::StageAdvanced { stage, expected });
            out_events.push(Event::DisplayRevealRequested { category: expected });
        }
        Transition::Solved => {
            out_events.push(Event::StageLedLit {
                stage: Stage::Third,
            });
            module.complete(out_events);
        }
        Transition::Fault(fault) => {
            error!("{id} {fault}. Solving module to prevent soft-locks.");
            for stage in Stage::ALL {
                out_events.push(Event::StageLedLit { stage });
            }
            out_events.push(Event::FaultRecovered {
                stage_number: module.tracker.stage_number(),
            });
            module.complete(out_events);
        }
    }

    PressOutcome::Correct
}

/// Judges a button press and forwards the resulting signals to the host.
pub fn press<H: Host + ?Sized>(
    module: &mut NoiseModule,
    button: ButtonId,
    host: &mut H,
) -> PressOutcome {
    let mut events = Vec::new();
    let outcome = press_button(module, button, &mut events);
    deliver(&events, host);
    outcome
}

/// Routes host-facing events to the provided host capability.
///
/// Presentation events are left for the feedback system and are skipped here.
pub fn deliver<H: Host + ?Sized>(events: &[Event], host: &mut H) {
    for event in events {
        match event {
            Event::ButtonPressed { button } => {
                host.pulse(INTERACTION_PULSE_STRENGTH);
                host.play_confirmation_sound(*button);
            }
            Event::StrikeSignalled { .. } => host.signal_strike(),
            Event::PassSignalled => host.signal_pass(),
            _ => {}
        }
    }
}

/// Query functions that provide read-only access to the module state.
pub mod query {
    use noise_identification_core::{Category, ModuleId, StageAssignment};

    use super::NoiseModule;

    /// Snapshot of the module's progress.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ModuleStatus {
        /// One-based stage counter; four once the module is solved.
        pub stage_number: u8,
        /// Whether the module has been solved.
        pub solved: bool,
    }

    /// Identifier of the module instance.
    #[must_use]
    pub fn module_id(module: &NoiseModule) -> ModuleId {
        module.id
    }

    /// Categories generated for the three stages.
    #[must_use]
    pub fn assignment(module: &NoiseModule) -> &StageAssignment {
        module.tracker.assignment()
    }

    /// Captures the module's current progress.
    #[must_use]
    pub fn status(module: &NoiseModule) -> ModuleStatus {
        ModuleStatus {
            stage_number: module.tracker.stage_number(),
            solved: module.solved,
        }
    }

    /// Category the module expects next, or `None` once solved.
    #[must_use]
    pub fn expected(module: &NoiseModule) -> Option<Category> {
        if module.solved {
            None
        } else {
            Some(module.tracker.expected())
        }
    }

    /// Reports whether the module has been solved.
    #[must_use]
    pub fn is_solved(module: &NoiseModule) -> bool {
        module.solved
    }
}
