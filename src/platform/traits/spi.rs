//! SPI interface trait
//!
//! This module defines the SPI bus communication interface that platform implementations must provide.

use crate::platform::Result;

/// SPI configuration
#[derive(Debug, Clone, Copy)]
pub struct SpiConfig {
    /// Bus frequency in Hz
    pub frequency: u32,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000, // 1 MHz
        }
    }
}

/// SPI interface trait
///
/// Platform implementations must provide this interface for SPI bus communication.
///
/// # Safety Invariants
///
/// - SPI peripheral must be initialized before use
/// - Only one owner per SPI bus instance
/// - No concurrent access to the same SPI bus from multiple contexts
/// - Chip select (CS) is managed by the implementation and brackets every call
pub trait SpiInterface {
    /// Transfer data (full-duplex)
    ///
    /// Simultaneously transmits data from `write_buffer` and receives data
    /// into `read_buffer`. Both buffers must have the same length.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi` if the transfer fails or times out.
    fn transfer(&mut self, write_buffer: &[u8], read_buffer: &mut [u8]) -> Result<()>;

    /// Write data (transmit only)
    ///
    /// Transmits data and discards received bytes.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi` if the write operation fails.
    fn write(&mut self, data: &[u8]) -> Result<()>;
}
