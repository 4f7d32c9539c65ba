//! Integration tests for the persistence layer.
//!
//! These tests exercise the LockRegistry against a real FileStore in a
//! temp directory: rehydration across instances, the durable snapshot
//! format, and expiry observed across process boundaries.

use std::fs;

use tempfile::TempDir;

use carrel::core::types::{DocumentId, HolderId};
use carrel::locks::{LockError, LockRegistry};
use carrel::store::{FileStore, Store};

// =============================================================================
// Test Helpers
// =============================================================================

const STORE_KEY: &str = "document_locks";

fn doc(id: &str) -> DocumentId {
    DocumentId::new(id).expect("valid document id")
}

fn holder(id: &str) -> HolderId {
    HolderId::new(id).expect("valid holder id")
}

struct TestStore {
    dir: TempDir,
}

impl TestStore {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    fn store(&self) -> FileStore {
        FileStore::with_dir(self.dir.path().join("carrel"))
    }

    fn open_registry(&self) -> LockRegistry {
        LockRegistry::open(Box::new(self.store()), STORE_KEY).expect("open registry")
    }

    fn snapshot_json(&self) -> String {
        self.store()
            .get(STORE_KEY)
            .expect("read store")
            .expect("snapshot present")
    }
}

// =============================================================================
// Rehydration
// =============================================================================

#[test]
fn locks_survive_registry_restart() {
    let env = TestStore::new();

    {
        let registry = env.open_registry();
        registry
            .acquire(&doc("contract.pdf"), &holder("billing"), 60)
            .expect("acquire");
        registry
            .acquire(&doc("contract.pdf"), &holder("crm"), 60)
            .expect("acquire");
    }

    let registry = env.open_registry();
    assert!(registry.is_locked(&doc("contract.pdf")).expect("is_locked"));

    let locks = registry.get_locks(&doc("contract.pdf")).expect("get_locks");
    assert_eq!(locks.len(), 2);
}

#[test]
fn fresh_directory_reads_as_empty_table() {
    let env = TestStore::new();

    let registry = env.open_registry();
    assert!(registry.snapshot().expect("snapshot").is_empty());

    // Nothing was written just by opening.
    assert!(env.store().get(STORE_KEY).expect("read").is_none());
}

#[test]
fn expiry_is_observed_across_instances() {
    let env = TestStore::new();

    {
        let registry = env.open_registry();
        registry
            .acquire(&doc("draft.docx"), &holder("editor"), 0)
            .expect("acquire");
    }

    // The snapshot still holds the entry: no sweep ran after the write.
    assert!(env.snapshot_json().contains("draft.docx"));

    // A fresh instance sweeps on first read and rewrites the snapshot.
    let registry = env.open_registry();
    assert!(!registry.is_locked(&doc("draft.docx")).expect("is_locked"));
    assert!(!env.snapshot_json().contains("draft.docx"));
}

#[test]
fn corrupt_snapshot_fails_open() {
    let env = TestStore::new();
    env.store().put(STORE_KEY, "{ not json").expect("put");

    let result = LockRegistry::open(Box::new(env.store()), STORE_KEY);
    assert!(matches!(result, Err(LockError::CorruptSnapshot(_))));
}

// =============================================================================
// Durable format
// =============================================================================

#[test]
fn snapshot_uses_wire_field_names() {
    let env = TestStore::new();

    let registry = env.open_registry();
    registry
        .acquire(&doc("contract.pdf"), &holder("billing"), 45)
        .expect("acquire");

    let json = env.snapshot_json();
    for field in [
        "\"documentId\"",
        "\"systemId\"",
        "\"lockedAt\"",
        "\"expiresAt\"",
        "\"timeoutMinutes\"",
    ] {
        assert!(json.contains(field), "snapshot missing {}: {}", field, json);
    }
    assert!(json.contains("\"timeoutMinutes\": 45"));
}

#[test]
fn snapshot_file_lands_under_store_directory() {
    let env = TestStore::new();

    let registry = env.open_registry();
    registry
        .acquire(&doc("contract.pdf"), &holder("billing"), 30)
        .expect("acquire");

    let path = env.dir.path().join("carrel").join("document_locks.json");
    assert!(path.exists());

    let on_disk = fs::read_to_string(path).expect("read snapshot file");
    assert_eq!(on_disk, env.snapshot_json());
}

#[test]
fn release_of_last_holder_empties_snapshot() {
    let env = TestStore::new();

    let registry = env.open_registry();
    registry
        .acquire(&doc("contract.pdf"), &holder("billing"), 30)
        .expect("acquire");
    registry
        .release(&doc("contract.pdf"), &holder("billing"))
        .expect("release");

    assert_eq!(env.snapshot_json().trim(), "{}");
}

#[test]
fn force_release_rewrites_snapshot() {
    let env = TestStore::new();

    let registry = env.open_registry();
    registry
        .acquire(&doc("contract.pdf"), &holder("billing"), 30)
        .expect("acquire");
    registry
        .acquire(&doc("contract.pdf"), &holder("crm"), 30)
        .expect("acquire");

    let outcome = registry
        .force_release(&doc("contract.pdf"), &holder("admin"))
        .expect("force release");
    assert_eq!(outcome.previous_locks.len(), 2);

    assert!(!env.snapshot_json().contains("contract.pdf"));

    // The cleared state is what a restart sees.
    let reopened = env.open_registry();
    assert!(!reopened.is_locked(&doc("contract.pdf")).expect("is_locked"));
}

// =============================================================================
// Cross-instance coordination
// =============================================================================

#[test]
fn renewal_in_one_instance_visible_after_restart() {
    let env = TestStore::new();

    let first_expiry = {
        let registry = env.open_registry();
        registry
            .acquire(&doc("contract.pdf"), &holder("billing"), 1)
            .expect("acquire")
            .expires_at
    };

    {
        let registry = env.open_registry();
        registry
            .renew(&doc("contract.pdf"), &holder("billing"), 120)
            .expect("renew");
    }

    let registry = env.open_registry();
    let locks = registry.get_locks(&doc("contract.pdf")).expect("get_locks");
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].timeout_minutes, 120);
    assert!(locks[0].expires_at > first_expiry);
}

#[test]
fn stats_reflect_rehydrated_table() {
    let env = TestStore::new();

    {
        let registry = env.open_registry();
        registry.acquire(&doc("a"), &holder("sysA"), 30).expect("acquire");
        registry.acquire(&doc("b"), &holder("sysA"), 120).expect("acquire");
        registry.acquire(&doc("b"), &holder("sysB"), 120).expect("acquire");
    }

    let registry = env.open_registry();
    let stats = registry.stats().expect("stats");

    assert_eq!(stats.total_locked_documents, 2);
    assert_eq!(stats.per_holder[&holder("sysA")], 2);
    assert_eq!(stats.per_holder[&holder("sysB")], 1);
    assert_eq!(stats.expiring_soon.len(), 1);
}
