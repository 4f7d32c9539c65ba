//! locks
//!
//! Advisory presence registry for collaborative editing.
//!
//! # Architecture
//!
//! "Locks" here are presence claims, not mutexes: any number of
//! distinct holders may claim the same document at once, and the
//! registry's job is to make those claims visible, durable, and
//! time-bounded. Exclusivity, if a caller wants it, is that caller's
//! policy, built on top of what the registry reports.
//!
//! - [`schema`] defines the durable table shape (camelCase JSON,
//!   deterministic ordering)
//! - [`LockRegistry`] owns the live table, persists through the
//!   [`Store`](crate::store::Store) trait, and sweeps expired entries
//!   lazily before each operation
//!
//! # Example
//!
//! ```ignore
//! use carrel::locks::LockRegistry;
//! use carrel::store::create_store;
//!
//! let registry = LockRegistry::open(create_store("file")?, "document_locks")?;
//! let lock = registry.acquire(&doc_id, &holder_id, 30)?;
//! ```

pub mod schema;

mod registry;

pub use registry::{ForceReleased, LockError, LockRegistry, LockStats, Released};
pub use schema::{Lock, LockTable};
