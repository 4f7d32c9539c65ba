//! Carrel - coordination core for remote document repositories
//!
//! Carrel lets independent systems coordinate concurrent editing over a
//! shared remote document repository: it keeps an advisory, multi-holder
//! presence registry ("locks") with time-based expiry and durable
//! persistence, and it resolves and searches the repository's content
//! tree using nothing but the repository's "list children of a node"
//! primitive.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types (ids, paths) and configuration schema
//! - [`store`] - Durable key-value persistence behind the `Store` trait
//! - [`repository`] - The `ContentDirectory` seam to the remote content tree
//! - [`locks`] - The advisory presence registry
//! - [`tree`] - Path resolution and pre-order tree search
//! - [`service`] - The typed operation surface a request layer consumes
//!
//! Transport concerns (HTTP routing, CORS, byte upload/download, the
//! repository wire protocol, environment loading) stay outside this
//! crate, behind the [`repository::ContentDirectory`] and
//! [`store::Store`] traits.
//!
//! # Correctness Invariants
//!
//! 1. A lock is presence, not exclusion: any number of distinct holders
//!    may hold claims on one document at once
//! 2. The durable lock snapshot matches in-memory state whenever a
//!    registry call returns successfully
//! 3. Expired claims are never observable: a lazy sweep runs before
//!    reads and writes
//! 4. Tree search visits nodes in pre-order, and a subtree that fails
//!    to list is skipped, never fatal

pub mod core;
pub mod locks;
pub mod repository;
pub mod service;
pub mod store;
pub mod tree;
