//! RFM69 register map
//!
//! Only the subset needed for continuous-mode OOK transmission via DIO2 is
//! defined; the remaining registers keep their reset defaults.

/// Operating mode
pub const REG_OP_MODE: u8 = 0x01;
/// Data operation mode and modulation
pub const REG_DATA_MODUL: u8 = 0x02;
/// Carrier frequency, most significant byte (0x07..0x09 hold 24 bits)
pub const REG_FRF_MSB: u8 = 0x07;
/// PA selection and output power
pub const REG_PA_LEVEL: u8 = 0x11;

/// First valid register number (0x00 is the FIFO)
pub const FIRST_REGISTER: u8 = 0x01;
/// Last valid register number
pub const LAST_REGISTER: u8 = 0x71;

/// OR-ed into the register number for SPI write access
pub const WRITE_FLAG: u8 = 0x80;

/// RegOpMode value: standby
pub const OP_MODE_STANDBY: u8 = 0x04;
/// RegOpMode value: transmit
pub const OP_MODE_TRANSMIT: u8 = 0x0C;

/// RegDataModul value: continuous mode via DIO2 without bit synchronization,
/// OOK modulation, no shaping
pub const DATA_MODUL_CONTINUOUS_OOK: u8 = 0x68;

/// RegPaLevel value: PA0 disabled, PA1 enabled. Required (though
/// undocumented) to use DIO2 as the continuous-mode input.
pub const PA_LEVEL_PA1: u8 = 0x5F;

/// Crystal frequency the Frf step derives from
pub const FXOSC_HZ: u32 = 32_000_000;

/// Frf divider exponent: step = FXOSC / 2^19
pub const FRF_DIVIDER_EXP: u32 = 19;
