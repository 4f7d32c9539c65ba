//! service::requests
//!
//! Typed request contracts for the operation surface.
//!
//! # Design
//!
//! These are the shapes a request layer hands to
//! [`DocumentService`](super::DocumentService) after parsing a
//! transport payload. Field names deserialize camelCase, matching the
//! parameter names external callers already use.
//!
//! Every fallible field is checked by `validate()` before the service
//! touches the registry or the repository; a request that fails
//! validation has no side effects anywhere.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{DocumentId, FolderPath, HolderId, TypeError};

/// A required request field is missing or invalid.
///
/// Raised before any persistence or remote call; a request that fails
/// validation changes no state.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid request field '{field}': {reason}")]
pub struct ValidationError {
    /// The offending field, in its wire spelling.
    pub field: &'static str,
    /// Why the value was rejected.
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

pub(crate) fn document_id(field: &'static str, raw: &str) -> Result<DocumentId, ValidationError> {
    DocumentId::new(raw).map_err(|e| ValidationError::new(field, type_error_reason(e)))
}

fn holder_id(field: &'static str, raw: &str) -> Result<HolderId, ValidationError> {
    HolderId::new(raw).map_err(|e| ValidationError::new(field, type_error_reason(e)))
}

fn type_error_reason(error: TypeError) -> String {
    match error {
        TypeError::InvalidDocumentId(reason)
        | TypeError::InvalidHolderId(reason)
        | TypeError::InvalidNodeId(reason) => reason,
    }
}

/// Register a holder's presence on a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireLockRequest {
    /// The document to claim.
    pub document_id: String,
    /// The claiming system.
    pub holder_id: String,
    /// Claim TTL; the service defaults this to its configured value.
    #[serde(default)]
    pub ttl_minutes: Option<u32>,
}

impl AcquireLockRequest {
    /// Validate the required identifiers.
    pub fn validate(&self) -> Result<(DocumentId, HolderId), ValidationError> {
        Ok((
            document_id("documentId", &self.document_id)?,
            holder_id("holderId", &self.holder_id)?,
        ))
    }
}

/// Remove a holder's presence from a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseLockRequest {
    /// The claimed document.
    pub document_id: String,
    /// The system giving up its claim.
    pub holder_id: String,
}

impl ReleaseLockRequest {
    /// Validate the required identifiers.
    pub fn validate(&self) -> Result<(DocumentId, HolderId), ValidationError> {
        Ok((
            document_id("documentId", &self.document_id)?,
            holder_id("holderId", &self.holder_id)?,
        ))
    }
}

/// Extend an existing claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewLockRequest {
    /// The claimed document.
    pub document_id: String,
    /// The holder whose claim is extended.
    pub holder_id: String,
    /// New TTL; the service defaults this to its configured value.
    #[serde(default)]
    pub ttl_minutes: Option<u32>,
}

impl RenewLockRequest {
    /// Validate the required identifiers.
    pub fn validate(&self) -> Result<(DocumentId, HolderId), ValidationError> {
        Ok((
            document_id("documentId", &self.document_id)?,
            holder_id("holderId", &self.holder_id)?,
        ))
    }
}

/// Administratively clear every claim on a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceReleaseRequest {
    /// The document to clear.
    pub document_id: String,
    /// The administrator requesting the clear (recorded in the outcome).
    pub acting_admin_id: String,
}

impl ForceReleaseRequest {
    /// Validate the required identifiers.
    pub fn validate(&self) -> Result<(DocumentId, HolderId), ValidationError> {
        Ok((
            document_id("documentId", &self.document_id)?,
            holder_id("actingAdminId", &self.acting_admin_id)?,
        ))
    }
}

/// Search the content tree by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Substring to match against node names, case-insensitively.
    pub query: String,
    /// Result cap; the service defaults this to its configured value.
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Path to start from; defaults to the repository root.
    #[serde(default)]
    pub start_path: Option<String>,
}

impl SearchRequest {
    /// Validate the query and normalize the start path.
    pub fn validate(&self) -> Result<(String, FolderPath), ValidationError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ValidationError::new("query", "query cannot be empty"));
        }

        let start_path = self
            .start_path
            .as_deref()
            .map(FolderPath::parse)
            .unwrap_or_else(FolderPath::root);

        Ok((query.to_string(), start_path))
    }
}

/// Create a folder under a parent path.
///
/// Contract-only: the core validates the request but never mutates the
/// remote repository, so execution belongs to the embedding
/// application's transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Name of the folder to create.
    pub name: String,
    /// Parent path; defaults to the repository root.
    #[serde(default)]
    pub parent_path: Option<String>,
}

impl CreateFolderRequest {
    /// Validate the folder name and normalize the parent path.
    pub fn validate(&self) -> Result<(String, FolderPath), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("name", "folder name cannot be empty"));
        }
        if name.contains('/') {
            return Err(ValidationError::new(
                "name",
                "folder name cannot contain '/'",
            ));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(ValidationError::new(
                "name",
                "folder name cannot contain control characters",
            ));
        }

        let parent = self
            .parent_path
            .as_deref()
            .map(FolderPath::parse)
            .unwrap_or_else(FolderPath::root);

        Ok((name.to_string(), parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_request_validates_ids() {
        let request = AcquireLockRequest {
            document_id: "doc-1".into(),
            holder_id: "sysA".into(),
            ttl_minutes: None,
        };
        let (doc, holder) = request.validate().expect("validate");
        assert_eq!(doc.as_str(), "doc-1");
        assert_eq!(holder.as_str(), "sysA");
    }

    #[test]
    fn acquire_request_rejects_empty_document_id() {
        let request = AcquireLockRequest {
            document_id: "  ".into(),
            holder_id: "sysA".into(),
            ttl_minutes: None,
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.field, "documentId");
    }

    #[test]
    fn acquire_request_rejects_empty_holder_id() {
        let request = AcquireLockRequest {
            document_id: "doc-1".into(),
            holder_id: "".into(),
            ttl_minutes: None,
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.field, "holderId");
    }

    #[test]
    fn force_release_names_admin_field() {
        let request = ForceReleaseRequest {
            document_id: "doc-1".into(),
            acting_admin_id: "".into(),
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.field, "actingAdminId");
    }

    #[test]
    fn search_request_rejects_blank_query() {
        let request = SearchRequest {
            query: "   ".into(),
            max_results: None,
            start_path: None,
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.field, "query");
    }

    #[test]
    fn search_request_defaults_start_path_to_root() {
        let request = SearchRequest {
            query: "report".into(),
            max_results: Some(5),
            start_path: None,
        };
        let (query, start) = request.validate().expect("validate");
        assert_eq!(query, "report");
        assert!(start.is_root());
    }

    #[test]
    fn search_request_normalizes_start_path() {
        let request = SearchRequest {
            query: "report".into(),
            max_results: None,
            start_path: Some("/Archive/".into()),
        };
        let (_, start) = request.validate().expect("validate");
        assert_eq!(start.as_display_string(), "/Archive");
    }

    #[test]
    fn create_folder_rejects_bad_names() {
        for name in ["", "   ", "a/b", "bad\nname"] {
            let request = CreateFolderRequest {
                name: name.into(),
                parent_path: None,
            };
            let err = request.validate().unwrap_err();
            assert_eq!(err.field, "name", "name {:?} should be rejected", name);
        }
    }

    #[test]
    fn create_folder_trims_name() {
        let request = CreateFolderRequest {
            name: "  Reports  ".into(),
            parent_path: Some("/sites".into()),
        };
        let (name, parent) = request.validate().expect("validate");
        assert_eq!(name, "Reports");
        assert_eq!(parent.as_display_string(), "/sites");
    }

    #[test]
    fn requests_deserialize_camel_case() {
        let request: AcquireLockRequest = serde_json::from_str(
            r#"{"documentId": "doc-1", "holderId": "sysA", "ttlMinutes": 15}"#,
        )
        .expect("deserialize");
        assert_eq!(request.ttl_minutes, Some(15));

        let request: SearchRequest =
            serde_json::from_str(r#"{"query": "report", "maxResults": 2, "startPath": "/a"}"#)
                .expect("deserialize");
        assert_eq!(request.max_results, Some(2));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let request: RenewLockRequest =
            serde_json::from_str(r#"{"documentId": "d", "holderId": "h"}"#).expect("deserialize");
        assert!(request.ttl_minutes.is_none());
    }

    #[test]
    fn error_display_formatting() {
        let err = ValidationError::new("documentId", "identifier cannot be empty");
        assert!(err.to_string().contains("documentId"));
        assert!(err.to_string().contains("empty"));
    }
}
