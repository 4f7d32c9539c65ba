//! locks::registry
//!
//! The advisory presence registry.
//!
//! # Architecture
//!
//! The registry owns the lock table and guarantees that its durable
//! image matches in-memory state whenever a call returns successfully.
//! It is constructed once per process: [`LockRegistry::open`] rehydrates
//! the table from the store (an absent snapshot is an empty table), and
//! every mutation rewrites the whole snapshot before the in-memory
//! table is updated.
//!
//! # Exclusion
//!
//! Every public operation takes a single mutex for its whole
//! read-modify-write cycle. Hosts that serve overlapping requests get
//! lost-update protection for free; reads observe a consistent,
//! already-swept snapshot because they take the same mutex.
//!
//! # Persist-then-commit
//!
//! Mutations are applied to a working copy of the table, the copy is
//! persisted, and only then does it replace the in-memory table. A
//! store failure therefore leaves both images on the previous
//! snapshot; the operation fails outright instead of diverging.
//!
//! # Expiry
//!
//! Expired entries are removed by a lazy sweep that runs at the start
//! of every operation except [`force_release`], which acts on the
//! table as-is and reports what it removed, expired or not.
//!
//! [`force_release`]: LockRegistry::force_release
//!
//! # Example
//!
//! ```
//! use carrel::core::types::{DocumentId, HolderId};
//! use carrel::locks::LockRegistry;
//! use carrel::store::MemoryStore;
//!
//! let registry = LockRegistry::open(Box::new(MemoryStore::new()), "document_locks").unwrap();
//!
//! let doc = DocumentId::new("doc-1").unwrap();
//! let holder = HolderId::new("billing").unwrap();
//!
//! registry.acquire(&doc, &holder, 30).unwrap();
//! assert!(registry.is_locked(&doc).unwrap());
//!
//! registry.release(&doc, &holder).unwrap();
//! assert!(!registry.is_locked(&doc).unwrap());
//! ```

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::schema::{decode_table, encode_table, Lock, LockTable};
use crate::core::types::{DocumentId, HolderId};
use crate::store::{Store, StoreError};

/// Errors from lock registry operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// A renew targeted a (document, holder) pair with no entry.
    #[error("document '{document_id}' is not locked by '{holder_id}'")]
    NotLocked {
        /// The document the renew targeted
        document_id: DocumentId,
        /// The holder whose entry was expected
        holder_id: HolderId,
    },

    /// The durable store failed to read or write.
    #[error("lock store failure: {0}")]
    Persistence(#[from] StoreError),

    /// The stored snapshot could not be parsed.
    #[error("corrupt lock snapshot: {0}")]
    CorruptSnapshot(String),

    /// The table could not be serialized.
    #[error("failed to serialize lock table: {0}")]
    SerializeError(String),
}

/// Outcome of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Released {
    /// The holder's entry existed and was removed.
    Unlocked,
    /// No entry existed for the (document, holder) pair.
    NotLocked,
}

impl std::fmt::Display for Released {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Released::Unlocked => write!(f, "unlocked"),
            Released::NotLocked => write!(f, "not_locked"),
        }
    }
}

/// Outcome of a force-release: the audit snapshot of what was removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceReleased {
    /// Every holder entry that was removed, expired entries included.
    pub previous_locks: Vec<Lock>,
    /// The administrator that requested the removal.
    pub unlocked_by: HolderId,
}

/// Aggregate statistics over the live lock table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockStats {
    /// Number of documents with at least one holder entry.
    pub total_locked_documents: usize,
    /// Holder entries per holder, across all documents.
    pub per_holder: BTreeMap<HolderId, usize>,
    /// Entries whose expiry is less than one hour away.
    pub expiring_soon: Vec<Lock>,
}

/// The advisory presence registry.
///
/// One instance per process; share it behind an `Arc` if multiple
/// request handlers need it. All methods take `&self`.
pub struct LockRegistry {
    /// Durable backing for the table snapshot.
    store: Box<dyn Store>,
    /// Store key the snapshot is kept under.
    key: String,
    /// The live table. The mutex is the registry's critical section.
    state: Mutex<LockTable>,
}

impl std::fmt::Debug for LockRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockRegistry").field("key", &self.key).finish()
    }
}

impl LockRegistry {
    /// Open the registry, rehydrating the table from the store.
    ///
    /// An absent snapshot is treated as an empty table; the storage
    /// location is created on the first write.
    ///
    /// # Errors
    ///
    /// - [`LockError::Persistence`] if the store cannot be read
    /// - [`LockError::CorruptSnapshot`] if a stored snapshot does not parse
    pub fn open(store: Box<dyn Store>, key: impl Into<String>) -> Result<Self, LockError> {
        let key = key.into();
        let table = match store.get(&key)? {
            Some(json) => {
                decode_table(&json).map_err(|e| LockError::CorruptSnapshot(e.to_string()))?
            }
            None => LockTable::new(),
        };

        Ok(Self {
            store,
            key,
            state: Mutex::new(table),
        })
    }

    /// Register that a holder is editing a document.
    ///
    /// Always succeeds: the registry records presence, it does not
    /// arbitrate exclusivity, so concurrent claims by distinct holders
    /// are expected. Re-acquiring an already-held (document, holder)
    /// pair overwrites the entry and so acts as an implicit renew.
    ///
    /// The caller supplies the TTL; operation surfaces default it to
    /// 30 minutes. A TTL of zero produces an entry the next sweep
    /// removes.
    ///
    /// # Errors
    ///
    /// [`LockError::Persistence`] if the snapshot write fails; the
    /// table is left unchanged in that case.
    pub fn acquire(
        &self,
        document_id: &DocumentId,
        holder_id: &HolderId,
        ttl_minutes: u32,
    ) -> Result<Lock, LockError> {
        let mut guard = self.state.lock().expect("lock registry mutex poisoned");
        let now = Utc::now();

        let mut next = guard.clone();
        sweep_expired(&mut next, now);

        let lock = Lock::claim(document_id.clone(), holder_id.clone(), ttl_minutes, now);
        next.entry(document_id.clone())
            .or_default()
            .insert(holder_id.clone(), lock.clone());

        self.persist(&next)?;
        *guard = next;
        Ok(lock)
    }

    /// Remove a holder's entry from a document.
    ///
    /// Removing the last holder removes the document key entirely.
    /// Releasing an entry that does not exist is not an error; the
    /// outcome reports which case occurred.
    pub fn release(
        &self,
        document_id: &DocumentId,
        holder_id: &HolderId,
    ) -> Result<Released, LockError> {
        let mut guard = self.state.lock().expect("lock registry mutex poisoned");
        let now = Utc::now();

        let mut next = guard.clone();
        let swept = sweep_expired(&mut next, now);

        let removed = match next.get_mut(document_id) {
            Some(holders) => {
                let removed = holders.remove(holder_id).is_some();
                if holders.is_empty() {
                    next.remove(document_id);
                }
                removed
            }
            None => false,
        };

        if swept || removed {
            self.persist(&next)?;
            *guard = next;
        }

        Ok(if removed {
            Released::Unlocked
        } else {
            Released::NotLocked
        })
    }

    /// Whether any holder currently has an entry on the document.
    ///
    /// Runs the expiry sweep first, so a lapsed claim never reads as
    /// locked.
    pub fn is_locked(&self, document_id: &DocumentId) -> Result<bool, LockError> {
        let mut guard = self.state.lock().expect("lock registry mutex poisoned");
        self.sweep_and_commit(&mut guard, Utc::now())?;

        Ok(guard.get(document_id).is_some_and(|h| !h.is_empty()))
    }

    /// All live holder entries on a document, in holder order.
    ///
    /// Empty when nobody holds the document.
    pub fn get_locks(&self, document_id: &DocumentId) -> Result<Vec<Lock>, LockError> {
        let mut guard = self.state.lock().expect("lock registry mutex poisoned");
        self.sweep_and_commit(&mut guard, Utc::now())?;

        Ok(guard
            .get(document_id)
            .map(|holders| holders.values().cloned().collect())
            .unwrap_or_default())
    }

    /// Extend a holder's claim from the current time.
    ///
    /// # Errors
    ///
    /// - [`LockError::NotLocked`] if the (document, holder) pair has no
    ///   entry, including entries that just lapsed (the sweep runs
    ///   first)
    /// - [`LockError::Persistence`] if the snapshot write fails
    pub fn renew(
        &self,
        document_id: &DocumentId,
        holder_id: &HolderId,
        ttl_minutes: u32,
    ) -> Result<Lock, LockError> {
        let mut guard = self.state.lock().expect("lock registry mutex poisoned");
        let now = Utc::now();

        let mut next = guard.clone();
        sweep_expired(&mut next, now);

        let lock = match next.get_mut(document_id).and_then(|h| h.get_mut(holder_id)) {
            Some(lock) => {
                lock.expires_at = now + Duration::minutes(i64::from(ttl_minutes));
                lock.timeout_minutes = ttl_minutes;
                lock.clone()
            }
            None => {
                return Err(LockError::NotLocked {
                    document_id: document_id.clone(),
                    holder_id: holder_id.clone(),
                })
            }
        };

        self.persist(&next)?;
        *guard = next;
        Ok(lock)
    }

    /// Unconditionally remove every holder entry on a document.
    ///
    /// This is the administrative escape hatch. It does not sweep
    /// first: the returned snapshot is exactly what the table held,
    /// expired entries included, so the audit trail shows what was
    /// cleared.
    pub fn force_release(
        &self,
        document_id: &DocumentId,
        acting_admin: &HolderId,
    ) -> Result<ForceReleased, LockError> {
        let mut guard = self.state.lock().expect("lock registry mutex poisoned");

        let mut next = guard.clone();
        let previous_locks: Vec<Lock> = next
            .remove(document_id)
            .map(|holders| holders.into_values().collect())
            .unwrap_or_default();

        if !previous_locks.is_empty() {
            self.persist(&next)?;
            *guard = next;
        }

        Ok(ForceReleased {
            previous_locks,
            unlocked_by: acting_admin.clone(),
        })
    }

    /// Aggregate statistics over the live table.
    pub fn stats(&self) -> Result<LockStats, LockError> {
        let mut guard = self.state.lock().expect("lock registry mutex poisoned");
        let now = Utc::now();
        self.sweep_and_commit(&mut guard, now)?;

        let mut per_holder: BTreeMap<HolderId, usize> = BTreeMap::new();
        let mut expiring_soon = Vec::new();

        for holders in guard.values() {
            for lock in holders.values() {
                *per_holder.entry(lock.system_id.clone()).or_insert(0) += 1;
                if lock.expires_within(Duration::hours(1), now) {
                    expiring_soon.push(lock.clone());
                }
            }
        }

        Ok(LockStats {
            total_locked_documents: guard.len(),
            per_holder,
            expiring_soon,
        })
    }

    /// A consistent copy of the whole live table.
    ///
    /// This backs the "query without a document id" operation surface.
    pub fn snapshot(&self) -> Result<LockTable, LockError> {
        let mut guard = self.state.lock().expect("lock registry mutex poisoned");
        self.sweep_and_commit(&mut guard, Utc::now())?;
        Ok(guard.clone())
    }

    /// Sweep the table under the lock; persist and commit only if the
    /// sweep removed anything.
    fn sweep_and_commit(
        &self,
        guard: &mut LockTable,
        now: DateTime<Utc>,
    ) -> Result<(), LockError> {
        let mut next = guard.clone();
        if sweep_expired(&mut next, now) {
            self.persist(&next)?;
            *guard = next;
        }
        Ok(())
    }

    /// Rewrite the durable snapshot.
    fn persist(&self, table: &LockTable) -> Result<(), LockError> {
        let json = encode_table(table).map_err(|e| LockError::SerializeError(e.to_string()))?;
        self.store.put(&self.key, &json)?;
        Ok(())
    }
}

/// Drop every entry whose expiry is strictly in the past; prune
/// documents left without holders. Returns whether anything changed.
fn sweep_expired(table: &mut LockTable, now: DateTime<Utc>) -> bool {
    let mut dropped = 0usize;

    table.retain(|_, holders| {
        holders.retain(|_, lock| {
            let keep = !lock.is_expired(now);
            if !keep {
                dropped += 1;
            }
            keep
        });
        !holders.is_empty()
    });

    if dropped > 0 {
        debug!(dropped, "expiry sweep removed lapsed lock entries");
    }
    dropped > 0
}
