//! Mock SPI implementation for testing

use crate::platform::{
    traits::{SpiConfig, SpiInterface},
    Result,
};
use std::vec::Vec;

/// SPI transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpiTransaction {
    /// Transfer (full-duplex)
    Transfer { write: Vec<u8>, read: Vec<u8> },
    /// Write only
    Write { data: Vec<u8> },
}

/// Mock SPI implementation
///
/// Records all transactions for test verification and allows
/// pre-programming expected read data.
#[derive(Debug)]
pub struct MockSpi {
    config: SpiConfig,
    transactions: Vec<SpiTransaction>,
    read_data: Vec<u8>,
}

impl MockSpi {
    /// Create a new mock SPI
    pub fn new(config: SpiConfig) -> Self {
        Self {
            config,
            transactions: Vec::new(),
            read_data: Vec::new(),
        }
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> &[SpiTransaction] {
        &self.transactions
    }

    /// Clear transaction log
    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    /// Queue data to return on subsequent transfers
    pub fn set_read_data(&mut self, data: &[u8]) {
        self.read_data = Vec::from(data);
    }

    /// Get current frequency
    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }
}

impl Default for MockSpi {
    fn default() -> Self {
        Self::new(SpiConfig::default())
    }
}

impl SpiInterface for MockSpi {
    fn transfer(&mut self, write_buffer: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        let to_read = core::cmp::min(read_buffer.len(), self.read_data.len());
        read_buffer[..to_read].copy_from_slice(&self.read_data[..to_read]);
        self.read_data.drain(..to_read);

        self.transactions.push(SpiTransaction::Transfer {
            write: Vec::from(write_buffer),
            read: Vec::from(&read_buffer[..]),
        });
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.transactions.push(SpiTransaction::Write {
            data: Vec::from(data),
        });
        Ok(())
    }
}
