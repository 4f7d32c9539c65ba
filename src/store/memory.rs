//! store::memory
//!
//! In-memory store for tests and single-process embedding.
//!
//! Values live in a mutex-guarded map and vanish with the process. The
//! store can also be armed to fail its next write, which is how tests
//! exercise the registry's no-divergence guarantee (a failed persist
//! must leave in-memory state on the previous snapshot).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{Store, StoreError};

/// In-memory key-value store.
///
/// Clonable handle over shared state, so a test can keep a handle while
/// the registry owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    values: HashMap<String, String>,
    fail_next_put: bool,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the store to fail the next `put` with a write error.
    ///
    /// The flag clears after one failed write.
    pub fn fail_next_put(&self) {
        self.inner.lock().expect("store mutex poisoned").fail_next_put = true;
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").values.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if inner.fail_next_put {
            inner.fail_next_put = false;
            return Err(StoreError::WriteError("injected write failure".into()));
        }
        inner.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.values.remove(key);
        Ok(())
    }
}
