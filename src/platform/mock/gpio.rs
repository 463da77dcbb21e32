//! Mock GPIO implementation for testing

use crate::platform::{
    traits::{GpioInterface, GpioMode},
    Result,
};
use std::vec::Vec;

/// Mock GPIO implementation
///
/// Tracks pin level, mode and the history of output writes. Input levels
/// can be forced by tests (button and reset-line simulation).
#[derive(Debug)]
pub struct MockGpio {
    level: bool,
    mode: GpioMode,
    writes: Vec<bool>,
}

impl MockGpio {
    /// Create a new mock pin in the given mode
    pub fn new(mode: GpioMode) -> Self {
        Self {
            level: false,
            mode,
            writes: Vec::new(),
        }
    }

    /// Force the level seen by `read` (input simulation)
    pub fn set_input_level(&mut self, high: bool) {
        self.level = high;
    }

    /// History of output writes (for test verification)
    pub fn writes(&self) -> &[bool] {
        &self.writes
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new(GpioMode::OutputPushPull)
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.level = true;
        self.writes.push(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        self.level = false;
        self.writes.push(false);
        Ok(())
    }

    fn read(&self) -> bool {
        self.level
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
