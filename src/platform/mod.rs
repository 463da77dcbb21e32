//! Platform abstraction layer
//!
//! Hardware access is expressed through the traits in [`traits`]; a platform
//! port implements them for its MCU, and the [`mock`] module implements them
//! in memory for host tests.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{PlatformError, Result};
