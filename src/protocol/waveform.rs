//! RTS pulse timing and the single transmit path
//!
//! One frame's waveform is: two hardware-wake pulse pairs, one software
//! sync pulse, 56 Manchester-coded payload bits MSB-first, an inter-frame
//! silence, and the long pulse pairs forming the inter-repeat gap. The
//! pulse-train hardware then plays the whole sequence three times
//! back-to-back. Receivers discard frames whose timings drift, so the
//! table below is not tunable.

use super::frame::FRAME_LEN;
use crate::platform::traits::{PulseLevel, PulseTrainInterface, RadioInterface};
use crate::platform::Result;

/// Hardware-wake pulse width (both halves of a pair)
pub const WAKE_PULSE_US: u32 = 2416;
/// Software sync: long high...
pub const SYNC_HIGH_US: u32 = 4550;
/// ...followed by one short low
pub const SYNC_LOW_US: u32 = 604;
/// Manchester half-bit width
pub const HALF_BIT_US: u32 = 604;
/// Inter-frame silence
pub const FRAME_GAP_US: u32 = 30415;
/// Wake pairs ahead of the sync pulse
pub const WAKE_PAIRS: usize = 2;
/// Wake-width pairs forming the inter-repeat gap
pub const REPEAT_GAP_PAIRS: usize = 5;
/// Fixed repetition played by the pulse hardware
pub const FRAME_REPEATS: u8 = 3;
/// Tick unit handed to the pulse hardware
pub const TICK_UNIT_US: u8 = 1;

/// The crate's single transmit path: a transceiver for carrier control and
/// a pulse train for bit timing, bracketed so standby is restored on every
/// return path.
pub struct RtsTransmitter<RF, P> {
    radio: RF,
    pulses: P,
}

impl<RF, P> RtsTransmitter<RF, P>
where
    RF: RadioInterface,
    P: PulseTrainInterface,
{
    pub fn new(radio: RF, pulses: P) -> Self {
        Self { radio, pulses }
    }

    /// Initialize the transceiver and program the carrier
    pub fn init(&mut self, carrier_hz: u32) -> Result<()> {
        self.radio.init()?;
        self.radio.set_carrier_frequency(carrier_hz)
    }

    /// Transmit one encoded frame with the fixed 3x repetition
    ///
    /// Standby is re-entered even when waveform playback fails; the first
    /// error wins.
    pub fn send(&mut self, frame: &[u8; FRAME_LEN]) -> Result<()> {
        self.radio.enter_transmit_mode()?;
        let played = self.play(frame);
        let standby = self.radio.enter_standby();
        played.and(standby)
    }

    fn play(&mut self, frame: &[u8; FRAME_LEN]) -> Result<()> {
        self.pulses.begin_waveform();

        for _ in 0..WAKE_PAIRS {
            self.pulses.append_pulse(WAKE_PULSE_US, PulseLevel::High)?;
            self.pulses.append_pulse(WAKE_PULSE_US, PulseLevel::Low)?;
        }

        self.pulses.append_pulse(SYNC_HIGH_US, PulseLevel::High)?;
        self.pulses.append_pulse(SYNC_LOW_US, PulseLevel::Low)?;

        // Manchester, MSB first: a set bit is the rising edge (low half,
        // then high half), a clear bit the falling edge.
        for byte in frame {
            for bit in (0..8).rev() {
                if (byte >> bit) & 1 != 0 {
                    self.pulses.append_pulse(HALF_BIT_US, PulseLevel::Low)?;
                    self.pulses.append_pulse(HALF_BIT_US, PulseLevel::High)?;
                } else {
                    self.pulses.append_pulse(HALF_BIT_US, PulseLevel::High)?;
                    self.pulses.append_pulse(HALF_BIT_US, PulseLevel::Low)?;
                }
            }
        }

        self.pulses.append_pulse(FRAME_GAP_US, PulseLevel::Low)?;

        for _ in 0..REPEAT_GAP_PAIRS {
            self.pulses.append_pulse(WAKE_PULSE_US, PulseLevel::High)?;
            self.pulses.append_pulse(WAKE_PULSE_US, PulseLevel::Low)?;
        }

        self.pulses.transmit(FRAME_REPEATS, TICK_UNIT_US)
    }

    /// Transceiver handle (mode inspection, reconfiguration)
    pub fn radio(&self) -> &RF {
        &self.radio
    }

    /// Pulse-train handle (waveform inspection in tests)
    pub fn pulse_train(&self) -> &P {
        &self.pulses
    }
}
