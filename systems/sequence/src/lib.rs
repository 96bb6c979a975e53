#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic sequence generator responsible for assigning stage categories.
//!
//! Every stage is drawn uniformly from the six categories. When a draw repeats
//! the category of the stage right before it, the draw is shifted once by a
//! random offset in `1..=5`. The shifted value is never re-validated; the
//! offset range alone guarantees it differs from its predecessor.

use std::ops::RangeInclusive;

use noise_identification_core::{Category, StageAssignment};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Offsets applied when a draw repeats its predecessor. Excludes 0 and 6 so a
/// single shift always lands on a different category.
pub const REPEAT_SHIFT_OFFSETS: RangeInclusive<usize> = 1..=5;

/// Configuration parameters required to construct the sequence generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Creates a configuration seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed fed into the generator's random stream.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Produces [`StageAssignment`] values that never repeat a category between
/// consecutive stages.
#[derive(Debug)]
pub struct SequenceGenerator<R = ChaCha8Rng> {
    rng: R,
}

impl SequenceGenerator<ChaCha8Rng> {
    /// Creates a seeded generator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(config.rng_seed))
    }
}

impl<R: Rng> SequenceGenerator<R> {
    /// Creates a generator drawing from an arbitrary random source.
    #[must_use]
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draws a fresh stage assignment.
    pub fn generate(&mut self) -> StageAssignment {
        let first = self.draw_category();

        let second = self.draw_category();
        let second = self.avoid_repeat(second, first);

        // Stage three only avoids stage two; matching stage one is allowed.
        let third = self.draw_category();
        let third = self.avoid_repeat(third, second);

        StageAssignment::new(first, second, third)
    }

    fn draw_category(&mut self) -> Category {
        Category::ALL[self.rng.gen_range(0..Category::COUNT)]
    }

    fn avoid_repeat(&mut self, candidate: Category, predecessor: Category) -> Category {
        if candidate != predecessor {
            return candidate;
        }

        let offset = self.rng.gen_range(REPEAT_SHIFT_OFFSETS);
        let shifted = shift_category(candidate, offset);
        debug!(
            repeated = %candidate,
            offset,
            shifted = %shifted,
            "shifted repeated stage category"
        );
        shifted
    }
}

/// Shifts a category forward by `offset` ordinals, wrapping around the six
/// categories.
#[must_use]
pub fn shift_category(category: Category, offset: usize) -> Category {
    Category::ALL[(category.ordinal() + offset) % Category::COUNT]
}
