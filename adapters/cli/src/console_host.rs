use noise_identification_core::{ButtonId, Host};
use tracing::debug;

/// Host that reports module signals on the terminal.
#[derive(Debug, Default)]
pub(crate) struct ConsoleHost {
    strikes: u32,
    solved: bool,
}

impl ConsoleHost {
    /// Number of strikes signalled so far.
    pub(crate) fn strikes(&self) -> u32 {
        self.strikes
    }

    /// Whether the module reported a solve.
    pub(crate) fn solved(&self) -> bool {
        self.solved
    }
}

impl Host for ConsoleHost {
    fn signal_strike(&mut self) {
        self.strikes = self.strikes.saturating_add(1);
        println!("STRIKE! ({} so far)", self.strikes);
    }

    fn signal_pass(&mut self) {
        self.solved = true;
        println!("Module solved.");
    }

    fn play_confirmation_sound(&mut self, button: ButtonId) {
        debug!(button = button.get(), "button press sound");
    }

    fn pulse(&mut self, strength: f32) {
        debug!(strength, "interaction pulse");
    }
}
