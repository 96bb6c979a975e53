#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation feedback system driving the display and stage LED animations.
//!
//! The system is purely cosmetic. It consumes module events, advances its
//! animations whenever [`Event::TimeAdvanced`] arrives, and exposes the
//! resulting [`FeedbackFrame`] for a renderer to draw. Nothing here feeds back
//! into press judging.

use std::time::Duration;

use glam::Vec3;
use noise_identification_core::{
    Category, Event, Stage, TextureId, TextureTable, STAGE_COUNT, TEXTURE_VARIANTS_PER_CATEGORY,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Scale applied to the display while it is hidden.
pub const COLLAPSED_SCALE: Vec3 = Vec3::new(0.001, 1.0, 0.001);
/// Position applied to the display while it is hidden.
pub const COLLAPSED_POSITION: Vec3 = Vec3::new(0.0, 0.45, 0.0);

/// Transform of the noise display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayPose {
    /// Local scale of the display plane.
    pub scale: Vec3,
    /// Local position of the display plane.
    pub position: Vec3,
}

impl DisplayPose {
    /// Pose of the hidden display.
    pub const COLLAPSED: Self = Self::new(COLLAPSED_SCALE, COLLAPSED_POSITION);

    /// Creates a pose from explicit scale and position.
    #[must_use]
    pub const fn new(scale: Vec3, position: Vec3) -> Self {
        Self { scale, position }
    }

    /// Interpolates between two poses, `t` clamped to `0.0..=1.0`.
    #[must_use]
    pub fn lerp(self, target: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            scale: self.scale.lerp(target.scale, t),
            position: self.position.lerp(target.position, t),
        }
    }
}

impl Default for DisplayPose {
    fn default() -> Self {
        Self::new(Vec3::ONE, Vec3::ZERO)
    }
}

/// Durations and rates shaping the animations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timings {
    /// Time the display stays collapsed before a reveal starts growing.
    pub reveal_hold: Duration,
    /// Interpolation progress gained per second while revealing.
    pub reveal_rate: f32,
    /// Duration of the first LED flash.
    pub led_flash: Duration,
    /// Duration the LED goes dark between the flash and staying lit.
    pub led_gap: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            reveal_hold: Duration::from_millis(200),
            reveal_rate: 1.3,
            led_flash: Duration::from_millis(90),
            led_gap: Duration::from_millis(60),
        }
    }
}

/// Configuration parameters required to construct the feedback system.
#[derive(Clone, Debug)]
pub struct FeedbackConfig {
    rng_seed: u64,
    resting_pose: DisplayPose,
    textures: TextureTable,
    timings: Timings,
}

impl FeedbackConfig {
    /// Creates a configuration with default pose, textures and timings.
    #[must_use]
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            resting_pose: DisplayPose::default(),
            textures: TextureTable::default(),
            timings: Timings::default(),
        }
    }

    /// Overrides the pose the display returns to after a reveal.
    #[must_use]
    pub fn with_resting_pose(mut self, resting_pose: DisplayPose) -> Self {
        self.resting_pose = resting_pose;
        self
    }

    /// Overrides the texture variant pools.
    #[must_use]
    pub fn with_textures(mut self, textures: TextureTable) -> Self {
        self.textures = textures;
        self
    }

    /// Overrides the animation timings.
    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }
}

/// Material applied to a stage LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedMaterial {
    /// Unlit material.
    Off,
    /// Lit material.
    On,
}

/// Everything a renderer needs to draw the module face for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedbackFrame {
    /// Texture currently applied to the display, if any was chosen yet.
    pub texture: Option<TextureId>,
    /// Current display transform.
    pub pose: DisplayPose,
    /// Materials of the three stage LEDs in stage order.
    pub leds: [LedMaterial; STAGE_COUNT],
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DisplayAnimation {
    Resting,
    Holding { remaining: Duration },
    Revealing { progress: f32 },
    Collapsed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LedAnimation {
    Off,
    Flash { remaining: Duration },
    Gap { remaining: Duration },
    On,
}

impl LedAnimation {
    fn material(self) -> LedMaterial {
        match self {
            Self::Off | Self::Gap { .. } => LedMaterial::Off,
            Self::Flash { .. } | Self::On => LedMaterial::On,
        }
    }

    fn advance(self, dt: Duration, timings: &Timings) -> Self {
        match self {
            Self::Flash { remaining } => match dt.checked_sub(remaining) {
                Some(leftover) => Self::Gap {
                    remaining: timings.led_gap,
                }
                .advance(leftover, timings),
                None => Self::Flash {
                    remaining: remaining - dt,
                },
            },
            Self::Gap { remaining } => {
                if dt >= remaining {
                    Self::On
                } else {
                    Self::Gap {
                        remaining: remaining - dt,
                    }
                }
            }
            Self::Off | Self::On => self,
        }
    }
}

/// Frame-driven feedback system.
#[derive(Debug)]
pub struct Feedback {
    rng: ChaCha8Rng,
    resting_pose: DisplayPose,
    textures: TextureTable,
    timings: Timings,
    texture: Option<TextureId>,
    pose: DisplayPose,
    display: DisplayAnimation,
    leds: [LedAnimation; STAGE_COUNT],
}

impl Feedback {
    /// Creates a new feedback system using the supplied configuration.
    #[must_use]
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            pose: config.resting_pose,
            resting_pose: config.resting_pose,
            textures: config.textures,
            timings: config.timings,
            texture: None,
            display: DisplayAnimation::Resting,
            leds: [LedAnimation::Off; STAGE_COUNT],
        }
    }

    /// Consumes module events in order, starting or advancing animations.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::DisplayShown { category } => self.show(*category),
                Event::DisplayRevealRequested { category } => self.reveal(*category),
                Event::DisplayCollapsed => self.collapse(),
                Event::StageLedLit { stage } => self.blink(*stage),
                Event::TimeAdvanced { dt } => self.advance(*dt),
                _ => {}
            }
        }
    }

    /// Captures the presentation state for the current frame.
    #[must_use]
    pub fn frame(&self) -> FeedbackFrame {
        FeedbackFrame {
            texture: self.texture,
            pose: self.pose,
            leds: self.leds.map(LedAnimation::material),
        }
    }

    /// Material currently applied to the LED of the provided stage.
    #[must_use]
    pub fn led(&self, stage: Stage) -> LedMaterial {
        self.leds[stage.index()].material()
    }

    /// Reports whether every animation has reached its resting state.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let display_idle = matches!(
            self.display,
            DisplayAnimation::Resting | DisplayAnimation::Collapsed
        );
        let leds_idle = self
            .leds
            .iter()
            .all(|led| matches!(led, LedAnimation::Off | LedAnimation::On));
        display_idle && leds_idle
    }

    fn show(&mut self, category: Category) {
        self.apply_texture(category);
        self.pose = self.resting_pose;
        self.display = DisplayAnimation::Resting;
    }

    fn reveal(&mut self, category: Category) {
        self.pose = DisplayPose::COLLAPSED;
        self.apply_texture(category);
        self.display = DisplayAnimation::Holding {
            remaining: self.timings.reveal_hold,
        };
    }

    fn collapse(&mut self) {
        debug!("display collapsed");
        self.pose = DisplayPose::COLLAPSED;
        self.display = DisplayAnimation::Collapsed;
    }

    fn blink(&mut self, stage: Stage) {
        self.leds[stage.index()] = LedAnimation::Flash {
            remaining: self.timings.led_flash,
        };
    }

    fn apply_texture(&mut self, category: Category) {
        let variant = self.rng.gen_range(0..TEXTURE_VARIANTS_PER_CATEGORY);
        let texture = self.textures.variants(category)[variant];
        debug!(%category, variant, texture = texture.get(), "applied display texture");
        self.texture = Some(texture);
    }

    fn advance(&mut self, dt: Duration) {
        for led in &mut self.leds {
            *led = led.advance(dt, &self.timings);
        }
        self.advance_display(dt);
    }

    fn advance_display(&mut self, dt: Duration) {
        let elapsed = match self.display {
            DisplayAnimation::Holding { remaining } => match dt.checked_sub(remaining) {
                Some(leftover) => {
                    self.display = DisplayAnimation::Revealing { progress: 0.0 };
                    leftover
                }
                None => {
                    self.display = DisplayAnimation::Holding {
                        remaining: remaining - dt,
                    };
                    return;
                }
            },
            DisplayAnimation::Revealing { .. } => dt,
            DisplayAnimation::Resting | DisplayAnimation::Collapsed => return,
        };

        let DisplayAnimation::Revealing { progress } = self.display else {
            return;
        };
        let progress = progress + elapsed.as_secs_f32() * self.timings.reveal_rate;
        if progress >= 1.0 {
            // Snap so frame-step rounding never leaves the display off its rest pose.
            self.pose = self.resting_pose;
            self.display = DisplayAnimation::Resting;
        } else {
            self.pose = DisplayPose::COLLAPSED.lerp(self.resting_pose, progress);
            self.display = DisplayAnimation::Revealing { progress };
        }
    }
}
