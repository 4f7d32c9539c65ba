//! service
//!
//! The typed operation surface consumed by the request layer.
//!
//! # Architecture
//!
//! [`DocumentService`] is the single object an embedding application
//! wires its transport to. It owns the lock registry and the tree
//! operations, applies configured defaults (TTL, result cap), and
//! validates every request before touching state. Routing, headers,
//! and byte transport stay outside.
//!
//! Lock operations are synchronous (memory and disk bound); tree
//! operations are async because they reach the remote repository.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use carrel::core::config::Settings;
//! use carrel::locks::LockRegistry;
//! use carrel::repository::MockDirectory;
//! use carrel::service::{AcquireLockRequest, DocumentService};
//! use carrel::store::MemoryStore;
//!
//! let registry = LockRegistry::open(Box::new(MemoryStore::new()), "document_locks").unwrap();
//! let service = DocumentService::new(
//!     registry,
//!     Arc::new(MockDirectory::new()),
//!     Settings::default(),
//! )
//! .unwrap();
//!
//! let lock = service
//!     .acquire_lock(&AcquireLockRequest {
//!         document_id: "doc-1".into(),
//!         holder_id: "sysA".into(),
//!         ttl_minutes: None,
//!     })
//!     .unwrap();
//! assert_eq!(lock.timeout_minutes, 30);
//! ```

mod requests;

pub use requests::{
    AcquireLockRequest, CreateFolderRequest, ForceReleaseRequest, ReleaseLockRequest,
    RenewLockRequest, SearchRequest, ValidationError,
};

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::core::config::Settings;
use crate::core::types::{FolderPath, TypeError};
use crate::locks::{
    ForceReleased, Lock, LockError, LockRegistry, LockStats, LockTable, Released,
};
use crate::repository::{ContentDirectory, DirectoryError, Node};
use crate::tree::{PathResolver, PathSeeds, ResolveError, SearchError, SearchOutcome, TreeSearch};

/// Errors from service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A request field failed validation; nothing was changed.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The lock registry rejected or failed the operation.
    #[error("lock operation failed: {0}")]
    Lock(#[from] LockError),

    /// A path could not be resolved.
    #[error("path resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// A search could not be started.
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    /// The repository failed while listing.
    #[error("repository failure: {0}")]
    Directory(#[from] DirectoryError),

    /// The configured seed map contains an invalid entry.
    #[error("invalid configuration: {0}")]
    Config(#[from] TypeError),
}

/// Lock state of one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockStatus {
    /// Whether any live holder entry remains.
    pub is_locked: bool,
    /// The live holder entries, in holder order.
    pub locks: Vec<Lock>,
}

/// The whole lock table plus aggregate statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockTableReport {
    /// The live table, document → holder → claim.
    pub locks: LockTable,
    /// Aggregates over the same snapshot.
    pub stats: LockStats,
}

/// Response to a lock query: one document or the full table.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LockQueryResponse {
    /// State of the queried document.
    Document(LockStatus),
    /// Full-table report (no document id given).
    Table(LockTableReport),
}

/// A path-addressed folder listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListing {
    /// The listed folder's normalized path.
    pub path: FolderPath,
    /// The folder's children, in repository listing order.
    pub items: Vec<Node>,
}

/// The coordination facade: advisory locks plus tree operations.
pub struct DocumentService {
    registry: LockRegistry,
    directory: Arc<dyn ContentDirectory>,
    resolver: PathResolver,
    search: TreeSearch,
    settings: Settings,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("directory", &self.directory.name())
            .finish()
    }
}

impl DocumentService {
    /// Wire a service from its collaborators and settings.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] if the settings' seed map
    /// contains an invalid node id.
    pub fn new(
        registry: LockRegistry,
        directory: Arc<dyn ContentDirectory>,
        settings: Settings,
    ) -> Result<Self, ServiceError> {
        let seeds = PathSeeds::from_entries(settings.seeds.clone())?;
        let resolver = PathResolver::new(directory.clone(), seeds);
        let search = TreeSearch::new(directory.clone(), resolver.clone());

        Ok(Self {
            registry,
            directory,
            resolver,
            search,
            settings,
        })
    }

    /// Register a holder's presence on a document.
    ///
    /// A request without a TTL uses the configured default.
    pub fn acquire_lock(&self, request: &AcquireLockRequest) -> Result<Lock, ServiceError> {
        let (document_id, holder_id) = request.validate()?;
        let ttl = request
            .ttl_minutes
            .unwrap_or(self.settings.default_ttl_minutes);
        Ok(self.registry.acquire(&document_id, &holder_id, ttl)?)
    }

    /// Remove a holder's presence from a document.
    pub fn release_lock(&self, request: &ReleaseLockRequest) -> Result<Released, ServiceError> {
        let (document_id, holder_id) = request.validate()?;
        Ok(self.registry.release(&document_id, &holder_id)?)
    }

    /// Extend a holder's claim.
    ///
    /// A request without a TTL uses the configured default.
    pub fn renew_lock(&self, request: &RenewLockRequest) -> Result<Lock, ServiceError> {
        let (document_id, holder_id) = request.validate()?;
        let ttl = request
            .ttl_minutes
            .unwrap_or(self.settings.default_ttl_minutes);
        Ok(self.registry.renew(&document_id, &holder_id, ttl)?)
    }

    /// Administratively clear every claim on a document.
    pub fn force_release(
        &self,
        request: &ForceReleaseRequest,
    ) -> Result<ForceReleased, ServiceError> {
        let (document_id, acting_admin) = request.validate()?;
        Ok(self.registry.force_release(&document_id, &acting_admin)?)
    }

    /// Query lock state.
    ///
    /// With a document id, reports that document's holders and whether
    /// it is locked. Without one, reports the full table plus
    /// statistics.
    pub fn query_lock(&self, document_id: Option<&str>) -> Result<LockQueryResponse, ServiceError> {
        match document_id {
            Some(raw) => {
                let document_id = requests::document_id("documentId", raw)?;
                let locks = self.registry.get_locks(&document_id)?;
                Ok(LockQueryResponse::Document(LockStatus {
                    is_locked: !locks.is_empty(),
                    locks,
                }))
            }
            None => {
                let locks = self.registry.snapshot()?;
                let stats = self.registry.stats()?;
                Ok(LockQueryResponse::Table(LockTableReport { locks, stats }))
            }
        }
    }

    /// Search the content tree by name.
    ///
    /// A request without a result cap uses the configured default; a
    /// request without a start path searches from the root.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, ServiceError> {
        let (query, start_path) = request.validate()?;
        let max_results = request
            .max_results
            .unwrap_or(self.settings.default_max_results);
        Ok(self.search.search(&query, max_results, &start_path).await?)
    }

    /// List the contents of a path-addressed folder.
    pub async fn list_contents(&self, raw_path: &str) -> Result<FolderListing, ServiceError> {
        let path = FolderPath::parse(raw_path);
        let node_id = self.resolver.resolve(&path).await?;
        let items = self.directory.list_children(&node_id).await?;
        Ok(FolderListing { path, items })
    }
}
