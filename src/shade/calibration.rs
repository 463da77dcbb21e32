//! Persisted per-channel calibration record
//!
//! The record travels through the NVS capability as a fixed 10-byte
//! little-endian blob keyed by the channel key string. Layout:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ rolling code:  u16           │  Offset: 0
//! ├──────────────────────────────┤
//! │ raise time ms: u32           │  Offset: 2
//! ├──────────────────────────────┤
//! │ lower time ms: u32           │  Offset: 6
//! └──────────────────────────────┘
//! ```

use core::fmt::Write as _;
use heapless::String;

/// Serialized record length in bytes
pub const RECORD_LEN: usize = 10;

/// Starting rolling code for a freshly initialized channel
pub const INITIAL_ROLLING_CODE: u16 = 0x00FF;

/// Default full-travel transit time in milliseconds
pub const DEFAULT_TRAVEL_MS: u32 = 10_000;

/// Storage key for one channel, `CH-NN`
pub type ChannelKey = String<8>;

/// Build the storage key for a channel number
pub fn channel_key(channel: u8) -> ChannelKey {
    let mut key = ChannelKey::new();
    // "CH-" plus two digits always fits the key capacity
    let _ = write!(key, "CH-{:02}", channel);
    key
}

/// Per-channel calibration state, persisted after every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShadeCalibration {
    /// Last transmitted rolling code; strictly advances by 1 per frame
    pub rolling_code: u16,
    /// Time to raise from fully closed to fully open, milliseconds
    pub raise_time_ms: u32,
    /// Time to lower from fully open to fully closed, milliseconds
    pub lower_time_ms: u32,
}

impl ShadeCalibration {
    /// Fresh calibration for a channel that has never been used
    pub fn new(raise_time_ms: u32, lower_time_ms: u32) -> Self {
        Self {
            rolling_code: INITIAL_ROLLING_CODE,
            raise_time_ms,
            lower_time_ms,
        }
    }

    /// Serialize to the fixed storage record
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[0..2].copy_from_slice(&self.rolling_code.to_le_bytes());
        buf[2..6].copy_from_slice(&self.raise_time_ms.to_le_bytes());
        buf[6..10].copy_from_slice(&self.lower_time_ms.to_le_bytes());
        buf
    }

    /// Deserialize from a storage record
    ///
    /// Returns `None` if the record does not have the expected length.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != RECORD_LEN {
            return None;
        }
        Some(Self {
            rolling_code: u16::from_le_bytes([bytes[0], bytes[1]]),
            raise_time_ms: u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
            lower_time_ms: u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
        })
    }
}

impl Default for ShadeCalibration {
    fn default() -> Self {
        Self::new(DEFAULT_TRAVEL_MS, DEFAULT_TRAVEL_MS)
    }
}
