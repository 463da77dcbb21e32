//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// SPI operation failed
    Spi(SpiError),
    /// GPIO operation failed
    Gpio(GpioError),
    /// RF transceiver operation failed
    Radio(RadioError),
    /// Pulse-train operation failed
    Pulse(PulseError),
    /// Non-volatile storage operation failed
    Storage(StorageError),
    /// Platform initialization failed
    InitializationFailed,
    /// Invalid configuration provided
    InvalidConfig,
    /// Resource not available
    ResourceUnavailable,
}

/// SPI-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// Transfer failed
    TransferFailed,
    /// Timeout occurred
    Timeout,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Invalid pin number
    InvalidPin,
    /// Invalid mode for operation
    InvalidMode,
}

/// RF transceiver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// Chip did not answer with the expected register contents
    NotResponding,
    /// Register number outside the valid range
    InvalidRegister,
    /// Carrier frequency cannot be represented
    InvalidFrequency,
}

/// Pulse-train errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseError {
    /// Waveform buffer is full
    SequenceOverflow,
    /// Playback could not be started or failed mid-way
    TransmitFailed,
}

/// Non-volatile storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
    /// Durable commit failed after a successful write
    CommitFailed,
    /// Key exceeds the store's key length limit
    KeyTooLong,
    /// Record exceeds the store's value size limit
    RecordTooLarge,
}

impl From<SpiError> for PlatformError {
    fn from(e: SpiError) -> Self {
        PlatformError::Spi(e)
    }
}

impl From<GpioError> for PlatformError {
    fn from(e: GpioError) -> Self {
        PlatformError::Gpio(e)
    }
}

impl From<RadioError> for PlatformError {
    fn from(e: RadioError) -> Self {
        PlatformError::Radio(e)
    }
}

impl From<PulseError> for PlatformError {
    fn from(e: PulseError) -> Self {
        PlatformError::Pulse(e)
    }
}

impl From<StorageError> for PlatformError {
    fn from(e: StorageError) -> Self {
        PlatformError::Storage(e)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Spi(e) => write!(f, "SPI error: {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::Radio(e) => write!(f, "radio error: {:?}", e),
            PlatformError::Pulse(e) => write!(f, "pulse-train error: {:?}", e),
            PlatformError::Storage(e) => write!(f, "storage error: {:?}", e),
            PlatformError::InitializationFailed => write!(f, "platform initialization failed"),
            PlatformError::InvalidConfig => write!(f, "invalid configuration"),
            PlatformError::ResourceUnavailable => write!(f, "resource not available"),
        }
    }
}
