//! Timer interface trait
//!
//! Monotonic time source driving the cooperative polling loop. Shade and
//! input state machines take explicit timestamps, so only the loop itself
//! samples this interface.

use crate::platform::Result;

/// Timer interface trait
pub trait TimerInterface {
    /// Blocking delay in microseconds
    fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Blocking delay in milliseconds
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay_us(ms.saturating_mul(1000))
    }

    /// Monotonic timestamp in microseconds since an arbitrary epoch
    fn now_us(&self) -> u64;

    /// Monotonic timestamp in milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
