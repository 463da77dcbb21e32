//! RFM69 driver implementation
//!
//! This driver is platform-agnostic and works with any implementation of
//! the SPI, GPIO and timer traits. Register writes are verified during
//! `init` so a wired-but-dead chip is detected before any shade claims to
//! be controllable.

use super::registers::{
    DATA_MODUL_CONTINUOUS_OOK, FIRST_REGISTER, FRF_DIVIDER_EXP, FXOSC_HZ, LAST_REGISTER,
    OP_MODE_STANDBY, OP_MODE_TRANSMIT, PA_LEVEL_PA1, REG_DATA_MODUL, REG_FRF_MSB, REG_OP_MODE,
    REG_PA_LEVEL, WRITE_FLAG,
};
use crate::log_error;
use crate::platform::error::RadioError;
use crate::platform::traits::{GpioInterface, RadioInterface, SpiInterface, TimerInterface};
use crate::platform::Result;

/// Settle time after register access (the chip is slow to latch mode
/// changes)
const REGISTER_SETTLE_MS: u32 = 10;
/// Reset pulse width
const RESET_PULSE_MS: u32 = 10;
/// Settle time after releasing reset
const RESET_SETTLE_MS: u32 = 100;

/// RFM69 transceiver driver
///
/// # Type Parameters
///
/// * `SPI` - SPI bus with the chip select managed per call
/// * `RESET` - GPIO output wired to the chip's reset pin
/// * `T` - Timer for settle delays
pub struct Rfm69Driver<SPI, RESET, T> {
    spi: SPI,
    reset: RESET,
    timer: T,
    initialized: bool,
}

impl<SPI, RESET, T> Rfm69Driver<SPI, RESET, T>
where
    SPI: SpiInterface,
    RESET: GpioInterface,
    T: TimerInterface,
{
    /// Create a new driver (uninitialized)
    ///
    /// Call [`RadioInterface::init`] before use.
    pub fn new(spi: SPI, reset: RESET, timer: T) -> Self {
        Self {
            spi,
            reset,
            timer,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Pulse the hardware reset line
    pub fn reset(&mut self) -> Result<()> {
        self.reset.set_high()?;
        self.timer.delay_ms(RESET_PULSE_MS)?;
        self.reset.set_low()?;
        self.timer.delay_ms(RESET_SETTLE_MS)
    }

    /// Write one configuration register
    pub fn set_register(&mut self, reg: u8, value: u8) -> Result<()> {
        if !(FIRST_REGISTER..=LAST_REGISTER).contains(&reg) {
            return Err(RadioError::InvalidRegister.into());
        }
        self.spi.write(&[reg | WRITE_FLAG, value])?;
        self.timer.delay_ms(REGISTER_SETTLE_MS)
    }

    /// Read one configuration register
    pub fn get_register(&mut self, reg: u8) -> Result<u8> {
        if !(FIRST_REGISTER..=LAST_REGISTER).contains(&reg) {
            return Err(RadioError::InvalidRegister.into());
        }
        let mut read = [0u8; 2];
        self.spi.transfer(&[reg, 0x00], &mut read)?;
        Ok(read[1])
    }
}

impl<SPI, RESET, T> RadioInterface for Rfm69Driver<SPI, RESET, T>
where
    SPI: SpiInterface,
    RESET: GpioInterface,
    T: TimerInterface,
{
    fn init(&mut self) -> Result<()> {
        self.reset()?;

        self.set_register(REG_DATA_MODUL, DATA_MODUL_CONTINUOUS_OOK)?;
        self.set_register(REG_PA_LEVEL, PA_LEVEL_PA1)?;

        // Read back both registers; a missing or unpowered chip answers
        // with zeros (or bus noise) and must not be reported as present.
        if self.get_register(REG_DATA_MODUL)? != DATA_MODUL_CONTINUOUS_OOK
            || self.get_register(REG_PA_LEVEL)? != PA_LEVEL_PA1
        {
            log_error!("RFM69 not found on SPI bus");
            return Err(RadioError::NotResponding.into());
        }

        self.initialized = true;
        Ok(())
    }

    fn set_carrier_frequency(&mut self, hz: u32) -> Result<()> {
        // Frf = hz / (FXOSC / 2^19), truncated to the 24-bit register triple
        let frf = ((hz as u64) << FRF_DIVIDER_EXP) / FXOSC_HZ as u64;
        if frf > 0xFF_FFFF {
            return Err(RadioError::InvalidFrequency.into());
        }

        // Burst write through RegFrfMsb..RegFrfLsb
        self.spi.write(&[
            REG_FRF_MSB | WRITE_FLAG,
            (frf >> 16) as u8,
            (frf >> 8) as u8,
            frf as u8,
        ])?;
        self.timer.delay_ms(REGISTER_SETTLE_MS)
    }

    fn enter_transmit_mode(&mut self) -> Result<()> {
        self.set_register(REG_OP_MODE, OP_MODE_TRANSMIT)
    }

    fn enter_standby(&mut self) -> Result<()> {
        self.set_register(REG_OP_MODE, OP_MODE_STANDBY)
    }
}
