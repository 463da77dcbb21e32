//! Mock clock implementation for testing
//!
//! Simulated monotonic time, advanced manually by tests driving the
//! cooperative loop.

use crate::platform::{traits::TimerInterface, Result};

/// Mock clock implementation
#[derive(Debug, Default)]
pub struct MockClock {
    now_us: u64,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance simulated time by `us` microseconds
    pub fn advance_us(&mut self, us: u64) {
        self.now_us = self.now_us.wrapping_add(us);
    }

    /// Advance simulated time by `ms` milliseconds
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance_us(ms * 1000);
    }
}

impl TimerInterface for MockClock {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.advance_us(us as u64);
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}
