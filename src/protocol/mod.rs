//! Somfy RTS protocol
//!
//! [`frame`] is the pure 7-byte codec; [`waveform`] turns an encoded frame
//! into the timed pulse sequence a real receiver expects and owns the single
//! transmit path through the RF hardware.

pub mod frame;
pub mod waveform;

pub use frame::{Command, DecodedFrame, FRAME_LEN};
pub use waveform::RtsTransmitter;
