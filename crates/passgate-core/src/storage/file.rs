//! Passcode hash persisted to a JSON file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{HashParams, PasscodeHasher, PasscodeStorage};
use crate::error::StorageError;

/// Storage record format version
const RECORD_VERSION: u32 = 1;

/// On-disk record
#[derive(Serialize, Deserialize)]
struct PasscodeRecord {
    /// Argon2id PHC string
    hash: String,
    /// Version for future migrations
    version: u32,
}

/// Stores the passcode hash in a single file
///
/// The file is read on every call, so a clear performed by another handle (or
/// another process) is observed immediately.
#[derive(Debug, Clone)]
pub struct FilePasscodeStorage {
    path: PathBuf,
    hasher: PasscodeHasher,
}

impl FilePasscodeStorage {
    /// Storage at the default location
    pub fn new() -> Self {
        Self::at(Self::default_path())
    }

    /// Storage at a custom path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            hasher: PasscodeHasher::default(),
        }
    }

    /// Override hashing cost
    pub fn with_params(mut self, params: HashParams) -> Self {
        self.hasher = PasscodeHasher::new(params);
        self
    }

    /// Default storage path under the user data directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("passgate")
            .join("passcode.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&self) -> Result<Option<PasscodeRecord>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: PasscodeRecord = serde_json::from_str(&contents)?;
        if record.version != RECORD_VERSION {
            return Err(StorageError::Serialization(format!(
                "Unsupported passcode record version {}",
                record.version
            )));
        }

        Ok(Some(record))
    }

    fn write_record(&self, record: &PasscodeRecord) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(record)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl Default for FilePasscodeStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PasscodeStorage for FilePasscodeStorage {
    fn has_stored_code(&self) -> Result<bool, StorageError> {
        Ok(self.read_record()?.is_some())
    }

    fn store(&self, code: &str) -> Result<(), StorageError> {
        let record = PasscodeRecord {
            hash: self.hasher.hash(code)?,
            version: RECORD_VERSION,
        };
        self.write_record(&record)?;
        tracing::debug!("Saved passcode hash to {:?}", self.path);
        Ok(())
    }

    fn load_and_compare(&self, code: &str) -> Result<bool, StorageError> {
        match self.read_record()? {
            Some(record) => self.hasher.verify(code, &record.hash),
            None => Ok(false),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Removed passcode file {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
