//! Discrete simulation clock.
//!
//! The clock owns the run/stop gate for ticking. Each (re)start opens a new
//! generation; real-time drivers key their timers off the generation so a
//! reset never leaves a stale timer behind.

use serde::{Deserialize, Serialize};

#[cfg(feature = "async")]
pub mod realtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    running: bool,
    generation: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            running: true,
            generation: 1,
        }
    }
}

impl Clock {
    /// Advance `elapsed` by one second. Does nothing while stopped.
    pub const fn tick(&self, elapsed: &mut u64) -> bool {
        if !self.running {
            return false;
        }
        *elapsed = elapsed.saturating_add(1);
        true
    }

    /// Halt ticking until the next restart.
    pub const fn stop(&mut self) {
        self.running = false;
    }

    /// Start a fresh run.
    pub const fn restart(&mut self) {
        self.running = true;
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
