//! Single-slot passcode storage
//!
//! The passcode is never persisted in clear. Every backend stores an Argon2id
//! PHC string and compares candidates with a constant-time verify.

mod file;
mod memory;

pub use file::FilePasscodeStorage;
pub use memory::MemoryPasscodeStorage;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::StorageError;

/// Persists and checks a hashed passcode
///
/// Implementations are shared between the view-model and every coordinator,
/// and may be cleared from outside an active flow, so all methods take `&self`.
pub trait PasscodeStorage: Send + Sync {
    /// True once a passcode has been stored
    fn has_stored_code(&self) -> Result<bool, StorageError>;

    /// Hash and store `code`, replacing any previous value
    fn store(&self, code: &str) -> Result<(), StorageError>;

    /// True if `code` matches the stored passcode; false when nothing is stored
    fn load_and_compare(&self, code: &str) -> Result<bool, StorageError>;

    /// Forget the stored passcode
    fn clear(&self) -> Result<(), StorageError>;
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashParams {
    /// Minimal cost, for tests only
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

/// Hashes passcodes into PHC strings and verifies candidates
#[derive(Debug, Clone, Default)]
pub struct PasscodeHasher {
    params: HashParams,
}

impl PasscodeHasher {
    pub fn new(params: HashParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> HashParams {
        self.params
    }

    fn argon2(&self) -> Result<Argon2<'static>, StorageError> {
        let params = Params::new(
            self.params.memory_kib,
            self.params.iterations,
            self.params.parallelism,
            None,
        )
        .map_err(|e| StorageError::Hash(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash `code` with a fresh salt
    pub fn hash(&self, code: &str) -> Result<String, StorageError> {
        let salt = SaltString::generate(&mut OsRng);
        let code_bytes = Zeroizing::new(code.as_bytes().to_vec());

        let hash = self
            .argon2()?
            .hash_password(&code_bytes, &salt)
            .map_err(|e| StorageError::Hash(format!("Failed to hash passcode: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Constant-time check of `code` against a stored PHC string
    ///
    /// Cost parameters are read from the stored hash, so records written with
    /// other parameters still verify.
    pub fn verify(&self, code: &str, stored: &str) -> Result<bool, StorageError> {
        let parsed_hash = PasswordHash::new(stored)
            .map_err(|e| StorageError::Hash(format!("Invalid stored hash: {}", e)))?;

        let code_bytes = Zeroizing::new(code.as_bytes().to_vec());
        Ok(Argon2::default()
            .verify_password(&code_bytes, &parsed_hash)
            .is_ok())
    }
}
