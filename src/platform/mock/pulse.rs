//! Mock pulse-train implementation for testing
//!
//! Records every appended pulse and every transmission so tests can assert
//! on the exact waveform, and can decode a recorded RTS waveform back into
//! its 7-byte payload for end-to-end checks.

use crate::platform::error::PulseError;
use crate::platform::{
    traits::{PulseLevel, PulseTrainInterface},
    Result,
};
use crate::protocol::frame::FRAME_LEN;
use crate::protocol::waveform::{HALF_BIT_US, REPEAT_GAP_PAIRS, WAKE_PAIRS};
use std::vec::Vec;

/// One recorded waveform segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub duration_us: u32,
    pub level: PulseLevel,
}

/// One recorded call to `transmit`
#[derive(Debug, Clone)]
pub struct Transmission {
    pub pulses: Vec<Pulse>,
    pub repeats: u8,
    pub tick_unit_us: u8,
}

/// Mock pulse-train implementation
#[derive(Debug, Default)]
pub struct MockPulseTrain {
    current: Vec<Pulse>,
    transmissions: Vec<Transmission>,
    fail_next_transmit: bool,
}

impl MockPulseTrain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed transmissions (for test verification)
    pub fn transmissions(&self) -> &[Transmission] {
        &self.transmissions
    }

    /// Make the next `transmit` fail
    pub fn fail_next_transmit(&mut self) {
        self.fail_next_transmit = true;
    }

    /// Decode the payload bytes of a recorded RTS transmission
    ///
    /// Walks past the wake and sync pulses, then reads each bit from the
    /// level of the first half-pulse (low first = rising edge = 1). Returns
    /// `None` if the waveform does not have the RTS shape.
    pub fn payload(&self, index: usize) -> Option<[u8; FRAME_LEN]> {
        let tx = self.transmissions.get(index)?;
        let data_start = WAKE_PAIRS * 2 + 2;
        let data_len = FRAME_LEN * 8 * 2;
        let expected = data_start + data_len + 1 + REPEAT_GAP_PAIRS * 2;
        if tx.pulses.len() != expected {
            return None;
        }

        let mut payload = [0u8; FRAME_LEN];
        for bit_index in 0..FRAME_LEN * 8 {
            let first = tx.pulses[data_start + bit_index * 2];
            let second = tx.pulses[data_start + bit_index * 2 + 1];
            if first.duration_us != HALF_BIT_US
                || second.duration_us != HALF_BIT_US
                || first.level == second.level
            {
                return None;
            }
            if first.level == PulseLevel::Low {
                payload[bit_index / 8] |= 1 << (7 - bit_index % 8);
            }
        }
        Some(payload)
    }
}

impl PulseTrainInterface for MockPulseTrain {
    fn begin_waveform(&mut self) {
        self.current.clear();
    }

    fn append_pulse(&mut self, duration_us: u32, level: PulseLevel) -> Result<()> {
        self.current.push(Pulse { duration_us, level });
        Ok(())
    }

    fn transmit(&mut self, repeats: u8, tick_unit_us: u8) -> Result<()> {
        if self.fail_next_transmit {
            self.fail_next_transmit = false;
            return Err(PulseError::TransmitFailed.into());
        }
        self.transmissions.push(Transmission {
            pulses: self.current.clone(),
            repeats,
            tick_unit_us,
        });
        Ok(())
    }
}
