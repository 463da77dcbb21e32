//! Pulse-train interface trait
//!
//! Timed high/low waveform generation on the transceiver's data pin. The
//! protocol layer builds one frame's waveform pulse by pulse and then plays
//! it with hardware-repeat; deviation from the requested timings breaks
//! receiver compatibility, so implementations must be cycle-accurate at the
//! configured tick unit.

use crate::platform::Result;

/// Logic level of one waveform segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseLevel {
    Low,
    High,
}

/// Pulse-train interface trait
///
/// # Safety Invariants
///
/// - At most one transmission in flight at a time (enforced by the caller's
///   single transmit path)
/// - `transmit` plays the waveform accumulated since the last
///   `begin_waveform`; once started it runs to completion
pub trait PulseTrainInterface {
    /// Reset the internal pulse sequence
    fn begin_waveform(&mut self);

    /// Append one timed segment to the waveform
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pulse(PulseError::SequenceOverflow)` if the
    /// waveform buffer is full.
    fn append_pulse(&mut self, duration_us: u32, level: PulseLevel) -> Result<()>;

    /// Play the accumulated waveform `repeats` times back-to-back
    ///
    /// `tick_unit_us` scales every appended duration. Blocks or schedules
    /// depending on the platform; either way the waveform is out (or
    /// committed to hardware) when this returns.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pulse(PulseError::TransmitFailed)` if playback
    /// cannot be started.
    fn transmit(&mut self, repeats: u8, tick_unit_us: u8) -> Result<()>;
}
