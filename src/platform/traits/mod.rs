//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod gpio;
pub mod nvs;
pub mod pulse;
pub mod radio;
pub mod spi;
pub mod timer;

// Re-export trait interfaces
pub use gpio::{GpioInterface, GpioMode};
pub use nvs::NvsInterface;
pub use pulse::{PulseLevel, PulseTrainInterface};
pub use radio::RadioInterface;
pub use spi::{SpiConfig, SpiInterface};
pub use timer::TimerInterface;
