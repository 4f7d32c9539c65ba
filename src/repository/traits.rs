//! repository::traits
//!
//! Content directory trait for the remote document repository.
//!
//! # Design
//!
//! The `ContentDirectory` trait is the only doorway to the remote
//! content tree. It is deliberately narrow (resolve the root, list the
//! children of a node) because that is all the coordination core
//! needs, and because the repository's wire protocol (CMIS browser
//! binding, vendor REST, anything else) lives entirely behind it.
//!
//! `list_children` is async because it involves network I/O. The root
//! id is configured, not fetched: resolving the root path must not cost
//! a remote call.
//!
//! # Example
//!
//! ```ignore
//! use carrel::repository::{ContentDirectory, DirectoryError};
//!
//! async fn count_children(dir: &dyn ContentDirectory) -> Result<usize, DirectoryError> {
//!     let root = dir.root_id();
//!     let children = dir.list_children(&root).await?;
//!     Ok(children.len())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::NodeId;

/// Errors from content directory operations.
///
/// Every variant is an upstream failure: the remote repository (or the
/// network between here and it) misbehaved. The core never retries;
/// callers decide whether the operation is worth repeating.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Authentication against the repository failed.
    #[error("repository authentication failed: {0}")]
    AuthFailed(String),

    /// The repository API returned an error status.
    #[error("repository API error: {status} - {message}")]
    ApiError {
        /// HTTP-style status code
        status: u16,
        /// Error message from the repository
        message: String,
    },

    /// Network or connection error.
    #[error("repository network error: {0}")]
    NetworkError(String),

    /// The repository answered with something unparseable.
    #[error("malformed repository response: {0}")]
    MalformedResponse(String),
}

/// A single entry in the remote content tree.
///
/// Nodes are produced by the directory collaborator and never mutated
/// by the core. The descriptive fields mirror what document
/// repositories commonly report for a listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Opaque repository identifier for this entry.
    pub id: NodeId,
    /// Display name, unique within its parent in practice.
    pub name: String,
    /// Whether this entry can itself be listed.
    pub is_folder: bool,
    /// Content size in bytes; folders have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Content MIME type; folders have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last modified.
    pub modified_at: DateTime<Utc>,
    /// Display name of the creating user.
    pub created_by: String,
    /// Display name of the last modifying user.
    pub modified_by: String,
}

/// The content directory trait for the remote document repository.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async
/// tasks.
///
/// # Timeouts
///
/// The trait defines no timeout of its own; implementations enforce
/// whatever per-call timeout their transport is configured with, and a
/// timeout surfaces as [`DirectoryError::NetworkError`].
#[async_trait]
pub trait ContentDirectory: Send + Sync {
    /// Get the directory name (e.g., "alfresco", "mock").
    fn name(&self) -> &'static str;

    /// The configured identifier of the repository root.
    ///
    /// This is known at construction time and never costs a remote
    /// call.
    fn root_id(&self) -> NodeId;

    /// List the children of a node, in the repository's listing order.
    ///
    /// The returned order is meaningful: path resolution takes the
    /// first case-insensitive name match, and tree search visits
    /// siblings in exactly this order.
    ///
    /// # Errors
    ///
    /// Any [`DirectoryError`] on network, protocol, or authentication
    /// failure. Listing a node that does not exist (or is not a
    /// folder) is an [`DirectoryError::ApiError`].
    async fn list_children(&self, parent: &NodeId) -> Result<Vec<Node>, DirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_node() -> Node {
        Node {
            id: NodeId::new("n-1").unwrap(),
            name: "report.pdf".to_string(),
            is_folder: false,
            size: Some(4096),
            mime_type: Some("application/pdf".to_string()),
            created_at: Utc::now(),
            modified_at: Utc::now(),
            created_by: "Alice".to_string(),
            modified_by: "Bob".to_string(),
        }
    }

    #[test]
    fn node_serializes_camel_case() {
        let json = serde_json::to_string(&sample_node()).expect("serialize");
        assert!(json.contains("\"isFolder\""));
        assert!(json.contains("\"mimeType\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"modifiedBy\""));
    }

    #[test]
    fn folder_omits_content_fields() {
        let folder = Node {
            is_folder: true,
            size: None,
            mime_type: None,
            ..sample_node()
        };
        let json = serde_json::to_string(&folder).expect("serialize");
        assert!(!json.contains("\"size\""));
        assert!(!json.contains("\"mimeType\""));
    }

    #[test]
    fn error_display_formatting() {
        let err = DirectoryError::AuthFailed("expired ticket".into());
        assert!(err.to_string().contains("authentication"));

        let err = DirectoryError::ApiError {
            status: 404,
            message: "node not found".into(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("node not found"));

        let err = DirectoryError::NetworkError("connection refused".into());
        assert!(err.to_string().contains("network"));

        let err = DirectoryError::MalformedResponse("not json".into());
        assert!(err.to_string().contains("malformed"));
    }
}
