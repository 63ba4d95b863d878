//! Tests for catalog persistence across store reopens.
//!
//! This test suite validates:
//! - Documents, grouping edges, relations, versions and bookmarks surviving
//!   a close/reopen cycle
//! - Version blobs round-tripping from disk
//! - The identity allocator never re-issuing an id after a restart

use satchel_core::sha256_hex;
use satchel_store::Store;

#[test]
fn a_reopened_store_serves_the_same_state() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("store");

    let (user, file, note, aspect, briefcase, predicate) = {
        let store = Store::open(&root).unwrap();
        let user = store.accounts.create("alice", &sha256_hex(b"pw")).unwrap();
        let file = store
            .documents
            .create_file(user, "keep.txt", "narration", b"version zero")
            .unwrap();
        store
            .versions
            .save_as_next_version(user, file, b"version one", "second draft")
            .unwrap();
        let note = store.documents.create_note(user, "note text").unwrap();

        let aspect = store.aspects.create(user, "work", "").unwrap();
        store.aspects.apply_many_to_one(user, &[aspect], file).unwrap();
        let briefcase = store.briefcases.create(user, "taxes", "").unwrap();
        store.briefcases.move_to(user, file, briefcase).unwrap();
        let predicate = store.relations.create_predicate(user, "cites").unwrap();
        store.relations.relate(user, note, file, predicate).unwrap();
        store.bookmarks.set(user, note).unwrap();
        (user, file, note, aspect, briefcase, predicate)
    };

    let store = Store::open(&root).unwrap();

    assert_eq!(store.accounts.get(user).unwrap().username, "alice");
    assert_eq!(store.documents.file_details(user, file).unwrap().name, "keep.txt");
    assert_eq!(store.documents.note_details(user, note).unwrap().text, "note text");

    assert!(store.aspects.applied_to(user, file).unwrap().contains(&aspect));
    assert_eq!(store.briefcases.containing(user, file).unwrap(), briefcase);
    assert!(store
        .relations
        .specific_exists(user, note, file, predicate)
        .unwrap());
    assert!(store.bookmarks.is_set(user, note).unwrap());

    assert_eq!(store.versions.current(user, file).unwrap(), 1);
    assert_eq!(store.versions.content(user, file, 0).unwrap(), b"version zero");
    assert_eq!(
        store.versions.current_content(user, file).unwrap(),
        b"version one"
    );

    // Authentication still works against the persisted account.
    assert_eq!(
        store.accounts.authenticate("alice", &sha256_hex(b"pw")).unwrap(),
        user
    );
}

#[test]
fn identifiers_stay_unique_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("store");

    let mut issued = Vec::new();
    for round in 0..3 {
        let store = Store::open(&root).unwrap();
        let user = store
            .accounts
            .create(&format!("user{}", round), &sha256_hex(b"pw"))
            .unwrap();
        issued.push(user);
        issued.push(store.documents.create_note(user, "note").unwrap());
        issued.push(store.aspects.create(user, "tag", "").unwrap());
    }

    let mut sorted = issued.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), issued.len(), "no identifier was re-issued");
    // Identifiers from later rounds are strictly greater.
    assert!(issued.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn the_global_briefcase_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("store");
    let (user, global) = {
        let store = Store::open(&root).unwrap();
        let user = store.accounts.create("alice", &sha256_hex(b"pw")).unwrap();
        (user, store.briefcases.global_id(user).unwrap())
    };

    let store = Store::open(&root).unwrap();
    assert_eq!(store.briefcases.global_id(user).unwrap(), global);
    let doc = store.documents.create_note(user, "fresh").unwrap();
    assert_eq!(store.briefcases.containing(user, doc).unwrap(), global);
}
