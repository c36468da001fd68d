//! In-process storage, for hosts that manage persistence themselves and for tests

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{HashParams, PasscodeHasher, PasscodeStorage};
use crate::error::StorageError;

/// Keeps the passcode hash in memory
#[derive(Debug, Default)]
pub struct MemoryPasscodeStorage {
    hasher: PasscodeHasher,
    hash: Mutex<Option<String>>,
}

impl MemoryPasscodeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: HashParams) -> Self {
        Self {
            hasher: PasscodeHasher::new(params),
            hash: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.hash.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PasscodeStorage for MemoryPasscodeStorage {
    fn has_stored_code(&self) -> Result<bool, StorageError> {
        Ok(self.slot().is_some())
    }

    fn store(&self, code: &str) -> Result<(), StorageError> {
        let hash = self.hasher.hash(code)?;
        *self.slot() = Some(hash);
        tracing::debug!("Stored passcode hash in memory");
        Ok(())
    }

    fn load_and_compare(&self, code: &str) -> Result<bool, StorageError> {
        // Clone so the lock is not held across the hash computation
        let stored = self.slot().clone();
        match stored {
            Some(hash) => self.hasher.verify(code, &hash),
            None => Ok(false),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot() = None;
        tracing::debug!("Cleared in-memory passcode");
        Ok(())
    }
}
