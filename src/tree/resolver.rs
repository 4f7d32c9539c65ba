//! tree::resolver
//!
//! Path-to-node resolution over the remote content tree.
//!
//! # Design
//!
//! The repository only answers "list the children of this node", so a
//! logical path is resolved by walking it segment by segment from the
//! root, matching each segment against child names case-insensitively.
//!
//! Two shortcuts avoid remote calls entirely: the root path resolves to
//! the configured root id, and a pre-populated seed map answers exact
//! matches for well-known paths in O(1).
//!
//! # Cost
//!
//! Nothing else is cached. Resolving a path of depth *d* costs up to
//! *d* remote listings, every time it is resolved, including repeated
//! resolutions of the same path. That is an accepted property of this
//! design, not an oversight: a cache would need an invalidation policy
//! tied to repository structure changes the core cannot observe.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::core::types::{FolderPath, NodeId, TypeError};
use crate::repository::{ContentDirectory, DirectoryError};

/// Errors from path resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A path segment could not be matched to a child node.
    #[error("path not found: {0}")]
    NotFound(String),

    /// The repository failed while listing children.
    #[error("repository failure while resolving: {0}")]
    Directory(#[from] DirectoryError),
}

/// Immutable map of well-known path → node-id entries.
///
/// Not a cache: entries never expire and are never added at runtime.
/// Keys are normalized through [`FolderPath`], so `/sites/` and
/// `sites` address the same entry.
///
/// # Example
///
/// ```
/// use carrel::core::types::FolderPath;
/// use carrel::tree::PathSeeds;
///
/// let seeds = PathSeeds::from_entries([
///     ("/sites".to_string(), "f5902ac4".to_string()),
/// ]).unwrap();
///
/// assert!(seeds.lookup(&FolderPath::parse("sites/")).is_some());
/// assert!(seeds.lookup(&FolderPath::parse("/other")).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathSeeds {
    entries: HashMap<String, NodeId>,
}

impl PathSeeds {
    /// An empty seed map; every resolution walks the tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a seed map from raw `(path, node id)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidNodeId`] if any node id is empty.
    pub fn from_entries<I>(entries: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = HashMap::new();
        for (path, node_id) in entries {
            let key = FolderPath::parse(&path);
            map.insert(key.as_str().to_string(), NodeId::new(node_id)?);
        }
        Ok(Self { entries: map })
    }

    /// Look up an exact normalized-path match.
    pub fn lookup(&self, path: &FolderPath) -> Option<&NodeId> {
        self.entries.get(path.as_str())
    }

    /// Number of seeded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves logical paths to remote node identifiers.
#[derive(Clone)]
pub struct PathResolver {
    directory: Arc<dyn ContentDirectory>,
    seeds: PathSeeds,
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("directory", &self.directory.name())
            .field("seeds", &self.seeds.len())
            .finish()
    }
}

impl PathResolver {
    /// Create a resolver over a directory with the given seed map.
    pub fn new(directory: Arc<dyn ContentDirectory>, seeds: PathSeeds) -> Self {
        Self { directory, seeds }
    }

    /// Resolve a path to the node id it addresses.
    ///
    /// Resolution order:
    ///
    /// 1. The root path returns the configured root id (no remote call).
    /// 2. An exact seed-map match returns the seeded id (no remote call).
    /// 3. Otherwise the path is walked from the root, one listing per
    ///    segment, taking the first child whose name matches the
    ///    segment case-insensitively.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] if any segment has no matching
    ///   child; the error names the full requested path
    /// - [`ResolveError::Directory`] if a listing fails upstream
    pub async fn resolve(&self, path: &FolderPath) -> Result<NodeId, ResolveError> {
        if path.is_root() {
            return Ok(self.directory.root_id());
        }

        if let Some(id) = self.seeds.lookup(path) {
            return Ok(id.clone());
        }

        let mut current = self.directory.root_id();
        for segment in path.segments() {
            let children = self.directory.list_children(&current).await?;
            let segment_lower = segment.to_lowercase();
            current = children
                .into_iter()
                .find(|child| child.name.to_lowercase() == segment_lower)
                .map(|child| child.id)
                .ok_or_else(|| ResolveError::NotFound(path.as_display_string()))?;
        }

        Ok(current)
    }
}
