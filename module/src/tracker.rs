//! Stage tracking state machine.
//!
//! The tracker keeps a one-based stage counter alongside the category the
//! player must press next. Accepting a correct press increments the counter
//! and resolves the new value through [`resolve`], which is the only place
//! that knows which counters are legal.

use noise_identification_core::{Category, Stage, StageAssignment, STAGE_COUNT};
use thiserror::Error;

/// Counter value reported once every stage has been cleared.
pub const SOLVED_STAGE_NUMBER: u8 = STAGE_COUNT as u8 + 1;

/// Internal-consistency failures detected by the stage tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ModuleFault {
    /// The counter landed on a value no stage or solved state corresponds to.
    #[error("arrived at unknown stage number {stage_number}")]
    UnreachableStage {
        /// Counter value observed after the increment.
        stage_number: u8,
    },
}

/// Outcome of accepting a correct press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// A new stage became active.
    Advanced {
        /// Stage that was just cleared; its LED lights up.
        cleared: Stage,
        /// Stage that is now active.
        stage: Stage,
        /// Category the player must identify next.
        expected: Category,
    },
    /// The final stage was cleared.
    Solved,
    /// The counter reached an impossible value.
    Fault(ModuleFault),
}

/// Resolves the transition that follows incrementing the counter to
/// `stage_number`.
#[must_use]
pub fn resolve(stage_number: u8, assignment: &StageAssignment) -> Transition {
    match stage_number {
        2 => Transition::Advanced {
            cleared: Stage::First,
            stage: Stage::Second,
            expected: assignment.second(),
        },
        3 => Transition::Advanced {
            cleared: Stage::Second,
            stage: Stage::Third,
            expected: assignment.third(),
        },
        SOLVED_STAGE_NUMBER => Transition::Solved,
        other => Transition::Fault(ModuleFault::UnreachableStage {
            stage_number: other,
        }),
    }
}

/// Tracks the active stage and the category expected from the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageTracker {
    assignment: StageAssignment,
    stage_number: u8,
    expected: Category,
}

impl StageTracker {
    /// Creates a tracker positioned at stage one.
    #[must_use]
    pub const fn new(assignment: StageAssignment) -> Self {
        Self {
            expected: assignment.first(),
            assignment,
            stage_number: 1,
        }
    }

    /// Restores a tracker at an arbitrary counter value.
    ///
    /// Counters that do not name a stage expect stage one's category.
    #[must_use]
    pub fn resume(assignment: StageAssignment, stage_number: u8) -> Self {
        let expected = Stage::from_number(stage_number)
            .map_or(assignment.first(), |stage| assignment.category(stage));
        Self {
            assignment,
            stage_number,
            expected,
        }
    }

    /// Categories assigned to the three stages.
    #[must_use]
    pub const fn assignment(&self) -> &StageAssignment {
        &self.assignment
    }

    /// Current one-based stage counter.
    #[must_use]
    pub const fn stage_number(&self) -> u8 {
        self.stage_number
    }

    /// Category the player must press next.
    #[must_use]
    pub const fn expected(&self) -> Category {
        self.expected
    }

    /// Accepts a correct press and moves to the next stage.
    pub fn advance(&mut self) -> Transition {
        self.stage_number = self.stage_number.saturating_add(1);
        let transition = resolve(self.stage_number, &self.assignment);
        if let Transition::Advanced { expected, .. } = transition {
            self.expected = expected;
        }
        transition
    }
}
