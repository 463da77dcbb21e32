//! RF transceiver interface trait
//!
//! Mode control for the OOK transceiver feeding the shade receivers. The
//! transceiver only shapes the carrier; the actual bit timing comes from the
//! pulse-train capability modulating its data input.

use crate::platform::Result;

/// RF transceiver interface trait
///
/// Platform implementations must provide this interface for carrier control.
///
/// # Safety Invariants
///
/// - `init` must succeed before any other call
/// - `enter_transmit_mode` and `enter_standby` must be paired around every
///   transmission, including on error paths
/// - Only one owner per transceiver instance
pub trait RadioInterface {
    /// Initialize the transceiver and verify it responds
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Radio(RadioError::NotResponding)` if the chip
    /// cannot be detected.
    fn init(&mut self) -> Result<()>;

    /// Set the carrier frequency in Hz
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Radio` if the frequency cannot be programmed.
    fn set_carrier_frequency(&mut self, hz: u32) -> Result<()>;

    /// Enable the transmitter
    fn enter_transmit_mode(&mut self) -> Result<()>;

    /// Return to standby (transmitter off)
    fn enter_standby(&mut self) -> Result<()>;
}
