//! Mock platform implementation for testing
//!
//! This module provides mock implementations of the platform traits that can
//! be used for unit testing without requiring actual hardware. Mocks record
//! their interactions for verification and support fault injection.
//!
//! # Feature Gate
//!
//! Available during test builds (`#[cfg(test)]`) and when the `mock` feature
//! is enabled.

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod nvs;
mod pulse;
mod radio;
mod spi;
mod timer;

pub use gpio::MockGpio;
pub use nvs::MockNvs;
pub use pulse::{MockPulseTrain, Pulse, Transmission};
pub use radio::{MockRadio, RadioMode};
pub use spi::{MockSpi, SpiTransaction};
pub use timer::MockClock;
