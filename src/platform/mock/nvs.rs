//! Mock non-volatile storage for testing
//!
//! In-memory key-value store with write-failure injection, standing in for
//! the NVS partition used on real hardware.

use crate::platform::error::StorageError;
use crate::platform::{traits::NvsInterface, Result};
use std::collections::BTreeMap;
use std::string::String;
use std::vec::Vec;

/// Mock non-volatile storage
#[derive(Debug, Default)]
pub struct MockNvs {
    records: BTreeMap<String, Vec<u8>>,
    save_count: u32,
    fail_next_save: bool,
}

impl MockNvs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw record contents (for test verification)
    pub fn record(&self, key: &str) -> Option<&[u8]> {
        self.records.get(key).map(|v| v.as_slice())
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> u32 {
        self.save_count
    }

    /// Make the next `save` fail before anything is written
    pub fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }
}

impl NvsInterface for MockNvs {
    fn load(&mut self, key: &str, buf: &mut [u8]) -> Result<Option<usize>> {
        match self.records.get(key) {
            None => Ok(None),
            Some(record) => {
                if record.len() > buf.len() {
                    return Err(StorageError::RecordTooLarge.into());
                }
                buf[..record.len()].copy_from_slice(record);
                Ok(Some(record.len()))
            }
        }
    }

    fn save(&mut self, key: &str, data: &[u8]) -> Result<()> {
        if self.fail_next_save {
            self.fail_next_save = false;
            return Err(StorageError::WriteFailed.into());
        }
        self.records.insert(String::from(key), Vec::from(data));
        self.save_count += 1;
        Ok(())
    }

    fn erase_all(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let mut nvs = MockNvs::new();
        nvs.save("CH-01", &[1, 2, 3]).unwrap();

        let mut buf = [0u8; 8];
        let len = nvs.load("CH-01", &mut buf).unwrap().unwrap();
        assert_eq!(&buf[..len], &[1, 2, 3]);
    }

    #[test]
    fn missing_key_loads_none() {
        let mut nvs = MockNvs::new();
        let mut buf = [0u8; 8];
        assert_eq!(nvs.load("CH-09", &mut buf).unwrap(), None);
    }

    #[test]
    fn oversized_record_rejected() {
        let mut nvs = MockNvs::new();
        nvs.save("CH-01", &[0u8; 16]).unwrap();
        let mut buf = [0u8; 4];
        assert!(nvs.load("CH-01", &mut buf).is_err());
    }

    #[test]
    fn injected_save_failure_is_one_shot() {
        let mut nvs = MockNvs::new();
        nvs.fail_next_save();
        assert!(nvs.save("CH-01", &[1]).is_err());
        assert!(nvs.save("CH-01", &[1]).is_ok());
    }

    #[test]
    fn erase_all_clears_records() {
        let mut nvs = MockNvs::new();
        nvs.save("CH-01", &[1]).unwrap();
        nvs.save("CH-02", &[2]).unwrap();
        nvs.erase_all().unwrap();
        assert!(nvs.is_empty());
    }
}
