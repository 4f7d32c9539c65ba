//! locks::schema
//!
//! Durable schema for the advisory lock table.
//!
//! # Format
//!
//! The whole table is persisted as one JSON document:
//!
//! ```json
//! {
//!   "doc-1": {
//!     "billing": {
//!       "documentId": "doc-1",
//!       "systemId": "billing",
//!       "lockedAt": "2026-08-07T14:02:11Z",
//!       "expiresAt": "2026-08-07T14:32:11Z",
//!       "timeoutMinutes": 30
//!     }
//!   }
//! }
//! ```
//!
//! Field names are camelCase on disk so external systems that already
//! consume the lock file keep working. Maps are ordered (`BTreeMap`),
//! so the same table always serializes to the same bytes.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{DocumentId, HolderId};

/// One advisory claim by one holder on one document.
///
/// Multiple distinct holders may hold locks on the same document at the
/// same time; a lock records presence, it does not grant exclusivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lock {
    /// The document this claim is on.
    pub document_id: DocumentId,
    /// The system holding the claim.
    pub system_id: HolderId,
    /// When the claim was made (or last overwritten by a re-acquire).
    pub locked_at: DateTime<Utc>,
    /// When the claim lapses. Always `locked_at + timeout_minutes`
    /// at acquire time; renewals move it forward from the renewal
    /// instant instead.
    pub expires_at: DateTime<Utc>,
    /// The TTL the claim was made (or last renewed) with.
    pub timeout_minutes: u32,
}

impl Lock {
    /// Create a claim starting at `now` and lapsing `ttl_minutes` later.
    ///
    /// A TTL of zero produces a claim that is already at its expiry
    /// instant; the next sweep removes it.
    pub fn claim(
        document_id: DocumentId,
        system_id: HolderId,
        ttl_minutes: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            document_id,
            system_id,
            locked_at: now,
            expires_at: now + Duration::minutes(i64::from(ttl_minutes)),
            timeout_minutes: ttl_minutes,
        }
    }

    /// Whether the claim's expiry instant is strictly in the past.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whether the claim lapses within the given window from `now`.
    ///
    /// Already-expired claims count as expiring.
    pub fn expires_within(&self, window: Duration, now: DateTime<Utc>) -> bool {
        self.expires_at - now < window
    }
}

/// The advisory lock table: document → holder → claim.
///
/// The in-memory table is the single source of truth; the durable
/// snapshot is rewritten in full after every mutation.
pub type LockTable = BTreeMap<DocumentId, BTreeMap<HolderId, Lock>>;

/// Serialize a table to its durable JSON form.
pub fn encode_table(table: &LockTable) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(table)
}

/// Parse a table from its durable JSON form.
pub fn decode_table(json: &str) -> Result<LockTable, serde_json::Error> {
    serde_json::from_str(json)
}
