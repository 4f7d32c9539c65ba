//! store
//!
//! Durable key-value persistence for the lock registry.
//!
//! # Architecture
//!
//! Persistence goes through the [`Store`] trait, which has two
//! implementations:
//!
//! - [`FileStore`]: one JSON document per key under `~/.carrel/` (default)
//! - [`MemoryStore`]: process-local map for tests and embedding
//!
//! The registry rewrites its whole table on every mutation, so the
//! store contract is deliberately coarse: whole documents in, whole
//! documents out, atomically.
//!
//! # Example
//!
//! ```ignore
//! use carrel::store::create_store;
//!
//! let store = create_store("file")?;
//! store.put("document_locks", "{}")?;
//! ```

mod file_store;
mod memory;
mod traits;

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use traits::{Store, StoreError};

/// Create a store based on the backend name.
///
/// # Backends
///
/// - `"file"` (default): [`FileStore`] under `~/.carrel/`
/// - `"memory"`: [`MemoryStore`], process-local
///
/// # Errors
///
/// - Unknown backend name
/// - Initialization errors from the store
pub fn create_store(backend: &str) -> Result<Box<dyn Store>, StoreError> {
    match backend {
        "file" => Ok(Box::new(FileStore::new()?)),
        "memory" => Ok(Box::new(MemoryStore::new())),
        other => Err(StoreError::BackendNotAvailable(format!(
            "unknown store backend: '{}' (valid: file, memory)",
            other
        ))),
    }
}

/// The default store backend name.
pub const DEFAULT_BACKEND: &str = "file";
