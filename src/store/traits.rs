//! store::traits
//!
//! Durable key-value store trait definition.
//!
//! # Design
//!
//! The `Store` trait defines the persistence seam for the lock registry:
//! whole documents keyed by name, written in full on every mutation.
//! Nothing in the core assumes a particular backing. A directory of
//! JSON files is the default; an embedded database or external cache
//! can be substituted without touching the registry.
//!
//! # Contract
//!
//! - A key that was never written reads as `Ok(None)`; callers treat an
//!   absent document as an empty one.
//! - A failed write must leave the previously stored value intact (no
//!   torn writes).
//! - Implementations must be thread-safe (`Send + Sync`).
//!
//! # Example
//!
//! ```ignore
//! use carrel::store::{Store, StoreError};
//!
//! fn load_or_default(store: &dyn Store) -> Result<String, StoreError> {
//!     Ok(store.get("document_locks")?.unwrap_or_else(|| "{}".to_string()))
//! }
//! ```

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read from the store.
    #[error("failed to read from store: {0}")]
    ReadError(String),

    /// Failed to write to the store.
    #[error("failed to write to store: {0}")]
    WriteError(String),

    /// Failed to delete from the store.
    #[error("failed to delete from store: {0}")]
    DeleteError(String),

    /// Backend not available or not configured.
    #[error("store backend not available: {0}")]
    BackendNotAvailable(String),
}

/// Trait for durable key-value persistence.
///
/// Keys are short identifiers like `document_locks`; values are whole
/// serialized documents. The store does not interpret values.
///
/// # Example
///
/// ```
/// use carrel::store::{MemoryStore, Store};
///
/// let store = MemoryStore::new();
///
/// store.put("document_locks", "{}").unwrap();
/// assert_eq!(store.get("document_locks").unwrap(), Some("{}".to_string()));
///
/// store.delete("document_locks").unwrap();
/// assert!(store.get("document_locks").unwrap().is_none());
/// ```
pub trait Store: Send + Sync {
    /// Get a stored value by key.
    ///
    /// Returns `Ok(Some(value))` if the key exists and `Ok(None)` if it
    /// was never written (or was deleted).
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value, replacing any existing value for the key.
    ///
    /// The write is all-or-nothing: on error the previous value must
    /// still be readable.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value.
    ///
    /// Deleting an absent key is not an error; delete is idempotent.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Check whether a key has a stored value.
    ///
    /// Default implementation uses `get()` and checks for `Some`.
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}
