//! repository::mock
//!
//! Mock content directory for deterministic testing.
//!
//! # Design
//!
//! The mock holds an in-memory tree, hands out children in insertion
//! order, and records every `list_children` call. The call log is what
//! lets tests assert traversal order and remote-call counts: for
//! example, that resolving `/` costs no listing at all, or that a
//! capped search never descends past its last match.
//!
//! Listing failures can be injected per node to exercise the
//! degrade-gracefully paths.
//!
//! # Example
//!
//! ```
//! use carrel::repository::{ContentDirectory, MockDirectory};
//!
//! # tokio_test::block_on(async {
//! let dir = MockDirectory::new();
//! let root = dir.root_id();
//!
//! let sites = dir.add_folder(&root, "Sites");
//! dir.add_file(&sites, "report.pdf");
//!
//! let children = dir.list_children(&root).await.unwrap();
//! assert_eq!(children.len(), 1);
//! assert_eq!(children[0].name, "Sites");
//! assert_eq!(dir.listings(), vec![root]);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::traits::{ContentDirectory, DirectoryError, Node};
use crate::core::types::NodeId;

/// Mock content directory for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share
/// the same tree.
#[derive(Debug, Clone)]
pub struct MockDirectory {
    inner: Arc<Mutex<MockDirectoryInner>>,
}

#[derive(Debug)]
struct MockDirectoryInner {
    /// Root node id.
    root: NodeId,
    /// Children per folder, in insertion order.
    children: HashMap<NodeId, Vec<Node>>,
    /// Injected listing failures per node.
    fail_listings: HashMap<NodeId, DirectoryError>,
    /// Every `list_children` call, in order.
    listings: Vec<NodeId>,
}

impl MockDirectory {
    /// Create an empty mock directory with a freshly minted root id.
    pub fn new() -> Self {
        let root = NodeId::new(Uuid::new_v4().to_string()).expect("uuid is non-empty");
        let mut children = HashMap::new();
        children.insert(root.clone(), Vec::new());

        Self {
            inner: Arc::new(Mutex::new(MockDirectoryInner {
                root,
                children,
                fail_listings: HashMap::new(),
                listings: Vec::new(),
            })),
        }
    }

    fn mint_timestamps() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now, now)
    }

    /// Add a folder under `parent` and return its minted id.
    pub fn add_folder(&self, parent: &NodeId, name: &str) -> NodeId {
        let id = NodeId::new(Uuid::new_v4().to_string()).expect("uuid is non-empty");
        let (created_at, modified_at) = Self::mint_timestamps();
        let node = Node {
            id: id.clone(),
            name: name.to_string(),
            is_folder: true,
            size: None,
            mime_type: None,
            created_at,
            modified_at,
            created_by: "test-user".to_string(),
            modified_by: "test-user".to_string(),
        };

        let mut inner = self.inner.lock().expect("mock mutex poisoned");
        inner.children.entry(parent.clone()).or_default().push(node);
        inner.children.insert(id.clone(), Vec::new());
        id
    }

    /// Add a file under `parent` and return its minted id.
    pub fn add_file(&self, parent: &NodeId, name: &str) -> NodeId {
        let id = NodeId::new(Uuid::new_v4().to_string()).expect("uuid is non-empty");
        let (created_at, modified_at) = Self::mint_timestamps();
        let node = Node {
            id: id.clone(),
            name: name.to_string(),
            is_folder: false,
            size: Some(1024),
            mime_type: Some("application/octet-stream".to_string()),
            created_at,
            modified_at,
            created_by: "test-user".to_string(),
            modified_by: "test-user".to_string(),
        };

        let mut inner = self.inner.lock().expect("mock mutex poisoned");
        inner.children.entry(parent.clone()).or_default().push(node);
        id
    }

    /// Inject a failure for listings of the given node.
    ///
    /// Every subsequent `list_children(node)` returns a clone of the
    /// error (the call is still recorded in the log).
    pub fn fail_listing(&self, node: &NodeId, error: DirectoryError) {
        let mut inner = self.inner.lock().expect("mock mutex poisoned");
        inner.fail_listings.insert(node.clone(), error);
    }

    /// All `list_children` calls so far, in order.
    pub fn listings(&self) -> Vec<NodeId> {
        self.inner
            .lock()
            .expect("mock mutex poisoned")
            .listings
            .clone()
    }

    /// Number of `list_children` calls so far.
    pub fn listing_count(&self) -> usize {
        self.inner.lock().expect("mock mutex poisoned").listings.len()
    }

    /// Forget recorded calls (failure injections stay in place).
    pub fn clear_log(&self) {
        self.inner
            .lock()
            .expect("mock mutex poisoned")
            .listings
            .clear();
    }
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentDirectory for MockDirectory {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn root_id(&self) -> NodeId {
        self.inner.lock().expect("mock mutex poisoned").root.clone()
    }

    async fn list_children(&self, parent: &NodeId) -> Result<Vec<Node>, DirectoryError> {
        let mut inner = self.inner.lock().expect("mock mutex poisoned");
        inner.listings.push(parent.clone());

        if let Some(error) = inner.fail_listings.get(parent) {
            return Err(error.clone());
        }

        match inner.children.get(parent) {
            Some(children) => Ok(children.clone()),
            None => Err(DirectoryError::ApiError {
                status: 404,
                message: format!("node not found: {}", parent),
            }),
        }
    }
}
