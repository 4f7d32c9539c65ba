//! store::file_store
//!
//! File-based durable store.
//!
//! # Durability
//!
//! - Each key is stored as `<dir>/<key>.json`
//! - All writes are atomic (write to temp file, fsync, then rename), so
//!   an interrupted write leaves the previous snapshot readable
//! - The directory is created on first write
//!
//! # Example
//!
//! ```ignore
//! use carrel::store::{FileStore, Store};
//!
//! let store = FileStore::new()?;
//! store.put("document_locks", "{}")?;
//!
//! if let Some(snapshot) = store.get("document_locks")? {
//!     // Rehydrate from snapshot...
//! }
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use super::traits::{Store, StoreError};

/// File-based store keeping one JSON document per key.
///
/// This is the default backing for the lock registry. The default
/// location is `~/.carrel/`; tests point it at a temp directory via
/// [`FileStore::with_dir`].
#[derive(Debug)]
pub struct FileStore {
    /// Directory holding one file per key.
    dir: PathBuf,
}

impl FileStore {
    /// Create a file store at the default location, `~/.carrel/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StoreError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::ReadError("cannot determine home directory".into()))?;
        Ok(Self {
            dir: home.join(".carrel"),
        })
    }

    /// Create a file store rooted at a custom directory.
    ///
    /// This is primarily useful for testing.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the stored documents.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Path of the file backing a key.
    fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        // Keys become file names; reject anything that would escape the
        // store directory.
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.starts_with('.') {
            return Err(StoreError::ReadError(format!(
                "invalid store key: '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            StoreError::ReadError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(Some(content))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            StoreError::WriteError(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        // Write to a temp file first so the previous snapshot survives a
        // failed or interrupted write.
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| {
                    StoreError::WriteError(format!("cannot create temp file: {}", e))
                })?;

            file.write_all(value.as_bytes())
                .map_err(|e| StoreError::WriteError(format!("cannot write value: {}", e)))?;

            file.sync_all()
                .map_err(|e| StoreError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &path)
            .map_err(|e| StoreError::WriteError(format!("cannot rename temp file: {}", e)))?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|e| {
            StoreError::DeleteError(format!("cannot remove {}: {}", path.display(), e))
        })
    }
}
