//! Non-volatile storage interface trait
//!
//! Key-value persistence for small fixed-size records (per-channel shade
//! calibration). Implementations must commit durably before returning from
//! `save`: a rolling code that was transmitted but not recorded
//! desynchronizes the receiver's acceptance window on the next reboot.

use crate::platform::Result;

/// Non-volatile storage interface trait
///
/// # Safety Invariants
///
/// - `save` returns only after the data is durable (commit included)
/// - Keys are short ASCII strings; implementations may bound key length and
///   record size and must report violations as `StorageError`
pub trait NvsInterface {
    /// Load the record stored under `key` into `buf`
    ///
    /// Returns `Ok(Some(len))` with the record length if the key exists,
    /// `Ok(None)` if it does not. A record longer than `buf` is an error.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Storage` if the store cannot be read or the
    /// record does not fit.
    fn load(&mut self, key: &str, buf: &mut [u8]) -> Result<Option<usize>>;

    /// Store `data` under `key`, replacing any previous record, and commit
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Storage` if the write or the commit fails.
    fn save(&mut self, key: &str, data: &[u8]) -> Result<()>;

    /// Erase every record and commit
    ///
    /// Destructive; callers are expected to restart afterwards so defaults
    /// re-initialize.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Storage` if the erase or the commit fails.
    fn erase_all(&mut self) -> Result<()>;
}
