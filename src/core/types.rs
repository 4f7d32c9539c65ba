//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`DocumentId`] - Opaque identifier of a document in the remote repository
//! - [`HolderId`] - Identifier of an external system claiming presence on a document
//! - [`NodeId`] - Opaque identifier of any node (file or folder) in the content tree
//! - [`FolderPath`] - Normalized `/`-delimited logical path into the content tree
//!
//! # Validation
//!
//! Identifier types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs: an empty
//! document id can never reach the lock table or the remote repository.
//!
//! # Examples
//!
//! ```
//! use carrel::core::types::{DocumentId, FolderPath, HolderId};
//!
//! // Valid constructions
//! let doc = DocumentId::new("8f2105b4-daaf-4874-9e8a-2152569d109b").unwrap();
//! let holder = HolderId::new("billing-portal").unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(DocumentId::new("").is_err());
//! assert!(HolderId::new("   ").is_err());
//!
//! // Paths normalize on parse
//! let path = FolderPath::parse(" /sites/swsdp/ ");
//! assert_eq!(path.as_display_string(), "/sites/swsdp");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid document id: {0}")]
    InvalidDocumentId(String),

    #[error("invalid holder id: {0}")]
    InvalidHolderId(String),

    #[error("invalid node id: {0}")]
    InvalidNodeId(String),
}

/// Validate an opaque identifier: non-empty and free of control characters.
fn validate_identifier(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("identifier cannot be empty".into());
    }
    if value.chars().any(|c| c.is_ascii_control()) {
        return Err("identifier cannot contain control characters".into());
    }
    Ok(())
}

/// An opaque identifier of a document in the remote repository.
///
/// The repository assigns these; the core never interprets their shape
/// beyond requiring them to be non-empty.
///
/// # Example
///
/// ```
/// use carrel::core::types::DocumentId;
///
/// let id = DocumentId::new("880a0f47-31b1-4101-b20b-4d325e54e8b1").unwrap();
/// assert_eq!(id.as_str(), "880a0f47-31b1-4101-b20b-4d325e54e8b1");
///
/// assert!(DocumentId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new validated document id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidDocumentId` if the value is empty,
    /// whitespace-only, or contains control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_identifier(&id).map_err(TypeError::InvalidDocumentId)?;
        Ok(Self(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an external system claiming presence on a document.
///
/// Multiple distinct holders may claim the same document at the same
/// time; the holder id is what distinguishes their entries in the
/// lock table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HolderId(String);

impl HolderId {
    /// Create a new validated holder id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidHolderId` if the value is empty,
    /// whitespace-only, or contains control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_identifier(&id).map_err(TypeError::InvalidHolderId)?;
        Ok(Self(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HolderId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HolderId> for String {
    fn from(id: HolderId) -> Self {
        id.0
    }
}

impl std::fmt::Display for HolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque identifier of a node (file or folder) in the content tree.
///
/// Produced by the repository collaborator; the core passes these back
/// to the repository without interpreting them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Create a new validated node id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidNodeId` if the value is empty,
    /// whitespace-only, or contains control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_identifier(&id).map_err(TypeError::InvalidNodeId)?;
        Ok(Self(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized `/`-delimited logical path into the content tree.
///
/// Parsing is infallible: each segment is trimmed of surrounding
/// whitespace, and segments left empty (from `//` or whitespace runs)
/// are dropped. The repository root is the empty path and displays as
/// `/`.
///
/// All path handling in the resolver and the tree search goes through
/// this type, so the normalization rules live in exactly one place.
///
/// # Example
///
/// ```
/// use carrel::core::types::FolderPath;
///
/// let root = FolderPath::parse("/");
/// assert!(root.is_root());
/// assert_eq!(root.as_display_string(), "/");
///
/// let path = FolderPath::parse("sites//swsdp/");
/// assert_eq!(path.segments().collect::<Vec<_>>(), vec!["sites", "swsdp"]);
/// assert_eq!(path.join("documentLibrary").as_display_string(), "/sites/swsdp/documentLibrary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FolderPath(String);

impl FolderPath {
    /// The repository root path.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse and normalize a raw path string.
    pub fn parse(raw: &str) -> Self {
        let segments: Vec<&str> = raw
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();
        Self(segments.join("/"))
    }

    /// Whether this path addresses the repository root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// Append a child name, producing the child's path.
    pub fn join(&self, name: &str) -> Self {
        Self::parse(&format!("{}/{}", self.0, name))
    }

    /// The normalized form without a leading slash (empty for root).
    ///
    /// This is the canonical key used by the path seed map.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The user-facing rendering: `/` for root, `/a/b` otherwise.
    pub fn as_display_string(&self) -> String {
        if self.is_root() {
            "/".to_string()
        } else {
            format!("/{}", self.0)
        }
    }
}

impl From<String> for FolderPath {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FolderPath> for String {
    fn from(path: FolderPath) -> Self {
        path.as_display_string()
    }
}

impl std::fmt::Display for FolderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_display_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_accepts_uuid_shaped_values() {
        let id = DocumentId::new("9b3bb45b-0d2a-45ff-bbb4-5b0d2aa5ffb1").unwrap();
        assert_eq!(id.as_str(), "9b3bb45b-0d2a-45ff-bbb4-5b0d2aa5ffb1");
    }

    #[test]
    fn document_id_rejects_empty_and_whitespace() {
        assert!(DocumentId::new("").is_err());
        assert!(DocumentId::new("  \t ").is_err());
    }

    #[test]
    fn document_id_rejects_control_characters() {
        assert!(DocumentId::new("doc\n1").is_err());
    }

    #[test]
    fn holder_id_roundtrips_through_serde() {
        let holder = HolderId::new("crm-system").unwrap();
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, "\"crm-system\"");

        let parsed: HolderId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, holder);
    }

    #[test]
    fn holder_id_serde_rejects_empty() {
        let result: Result<HolderId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn node_id_display_matches_value() {
        let id = NodeId::new("f5902ac4").unwrap();
        assert_eq!(format!("{}", id), "f5902ac4");
    }

    #[test]
    fn folder_path_root_forms() {
        for raw in ["", "/", "  /  ", "///"] {
            let path = FolderPath::parse(raw);
            assert!(path.is_root(), "expected {:?} to normalize to root", raw);
            assert_eq!(path.as_display_string(), "/");
        }
    }

    #[test]
    fn folder_path_trims_and_collapses() {
        let path = FolderPath::parse(" /sites//swsdp/documentLibrary/ ");
        assert_eq!(path.as_str(), "sites/swsdp/documentLibrary");
        assert_eq!(
            path.segments().collect::<Vec<_>>(),
            vec!["sites", "swsdp", "documentLibrary"]
        );
    }

    #[test]
    fn folder_path_join_from_root() {
        let child = FolderPath::root().join("sites");
        assert_eq!(child.as_display_string(), "/sites");
    }

    #[test]
    fn folder_path_parse_is_idempotent() {
        let once = FolderPath::parse("/a/b/");
        let twice = FolderPath::parse(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn folder_path_display_has_leading_slash() {
        let path = FolderPath::parse("a/b");
        assert_eq!(format!("{}", path), "/a/b");
    }

    #[test]
    fn error_display_formatting() {
        let err = TypeError::InvalidDocumentId("identifier cannot be empty".into());
        assert!(err.to_string().contains("document id"));

        let err = TypeError::InvalidHolderId("identifier cannot be empty".into());
        assert!(err.to_string().contains("holder id"));

        let err = TypeError::InvalidNodeId("identifier cannot be empty".into());
        assert!(err.to_string().contains("node id"));
    }
}
