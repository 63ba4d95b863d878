//! Tests for the version & hash engine.
//!
//! This test suite validates:
//! - Monotonic version numbering from 0 and content round-trips
//! - The exact duplicate-score table (1.0 / 0.90 / 0.85 / 0.75)
//! - The content gate: differing bytes never score, whatever the name or
//!   narration
//! - A file never scoring against itself

use satchel_core::{sha256_hex, Error};
use satchel_store::Store;

fn store_with_user() -> (tempfile::TempDir, Store, u64) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("store")).unwrap();
    let user = store.accounts.create("alice", &sha256_hex(b"pw")).unwrap();
    (dir, store, user)
}

#[test]
fn versions_are_monotonic_from_zero() {
    let (_dir, store, user) = store_with_user();
    let file = store
        .documents
        .create_file(user, "draft.txt", "", b"first")
        .unwrap();
    assert_eq!(store.versions.current(user, file).unwrap(), 0);

    let v1 = store
        .versions
        .save_as_next_version(user, file, b"second", "tightened wording")
        .unwrap();
    let v2 = store
        .versions
        .save_as_next_version(user, file, b"third", "")
        .unwrap();
    assert_eq!((v1, v2), (1, 2));
    assert_eq!(store.versions.current(user, file).unwrap(), 2);

    let history = store.versions.versions(user, file).unwrap();
    assert_eq!(
        history.iter().map(|v| v.version).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(history[1].comment, "tightened wording");

    assert_eq!(store.versions.content(user, file, 0).unwrap(), b"first");
    assert_eq!(store.versions.current_content(user, file).unwrap(), b"third");
    assert!(matches!(
        store.versions.content(user, file, 9),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn version_hashes_are_fixed_width_and_content_addressed() {
    let (_dir, store, user) = store_with_user();
    let file = store
        .documents
        .create_file(user, "a.bin", "", b"payload")
        .unwrap();
    let history = store.versions.versions(user, file).unwrap();
    assert_eq!(history[0].content_hash.len(), satchel_core::defaults::CONTENT_HASH_LEN);
    assert_eq!(history[0].content_hash, store.versions.content_hash(b"payload"));
}

#[test]
fn duplicate_scores_match_the_contract_exactly() {
    let (_dir, store, user) = store_with_user();
    let content = b"identical bytes";
    let target = store
        .documents
        .create_file(user, "report.txt", "quarterly", content)
        .unwrap();

    let full = store
        .documents
        .create_file(user, "report.txt", "quarterly", content)
        .unwrap();
    let name_only = store
        .documents
        .create_file(user, "report.txt", "different narration", content)
        .unwrap();
    let narration_only = store
        .documents
        .create_file(user, "other.txt", "quarterly", content)
        .unwrap();
    let content_only = store
        .documents
        .create_file(user, "other.txt", "different narration", content)
        .unwrap();
    // Same name and narration but different bytes: never in the result.
    let different_bytes = store
        .documents
        .create_file(user, "report.txt", "quarterly", b"other bytes")
        .unwrap();

    let scores = store.versions.duplicates_of(user, target).unwrap();
    assert_eq!(scores.get(&full), Some(&1.0));
    assert_eq!(scores.get(&name_only), Some(&0.90));
    assert_eq!(scores.get(&narration_only), Some(&0.85));
    assert_eq!(scores.get(&content_only), Some(&0.75));
    assert!(!scores.contains_key(&different_bytes));
    assert!(!scores.contains_key(&target));
    assert_eq!(scores.len(), 4);
}

#[test]
fn duplicates_compare_current_versions() {
    let (_dir, store, user) = store_with_user();
    let target = store
        .documents
        .create_file(user, "a.txt", "", b"v0 bytes")
        .unwrap();
    let other = store
        .documents
        .create_file(user, "a.txt", "", b"unrelated")
        .unwrap();

    assert!(store.versions.duplicates_of(user, target).unwrap().is_empty());

    // Once the other file's *current* version matches, it scores.
    store
        .versions
        .save_as_next_version(user, other, b"v0 bytes", "")
        .unwrap();
    let scores = store.versions.duplicates_of(user, target).unwrap();
    assert_eq!(scores.get(&other), Some(&1.0));
}

#[test]
fn duplicates_are_scoped_to_one_owner() {
    let (_dir, store, alice) = store_with_user();
    let bob = store.accounts.create("bob", &sha256_hex(b"pw")).unwrap();
    let target = store
        .documents
        .create_file(alice, "a.txt", "", b"shared bytes")
        .unwrap();
    store
        .documents
        .create_file(bob, "a.txt", "", b"shared bytes")
        .unwrap();

    assert!(store.versions.duplicates_of(alice, target).unwrap().is_empty());
}

#[test]
fn version_operations_require_a_file_document() {
    let (_dir, store, user) = store_with_user();
    let note = store.documents.create_note(user, "n").unwrap();
    assert!(matches!(
        store.versions.save_as_next_version(user, note, b"x", ""),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        store.versions.duplicates_of(user, note),
        Err(Error::NotFound(_))
    ));
}
