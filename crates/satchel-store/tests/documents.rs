//! Tests for the document registry.
//!
//! This test suite validates:
//! - UUID stability and per-owner divergence for bit-identical content
//! - Zero-id-before-existence error ordering
//! - Cascading deletion across every grouping, relation, bookmark and
//!   version index
//! - Case-insensitive extension lookup
//! - Schema-free record naming and property rules

use satchel_core::{sha256_hex, DocumentKind, Error};
use satchel_store::Store;

fn store_with_user() -> (tempfile::TempDir, Store, u64) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("store")).unwrap();
    let user = store.accounts.create("alice", &sha256_hex(b"pw")).unwrap();
    (dir, store, user)
}

#[test]
fn uuid_is_stable_across_repeated_calls() {
    let (_dir, store, user) = store_with_user();
    let note = store.documents.create_note(user, "hello").unwrap();
    let first = store.documents.uuid(user, note).unwrap();
    let second = store.documents.uuid(user, note).unwrap();
    assert_eq!(first, second);
}

#[test]
fn identical_content_under_two_owners_yields_different_uuids() {
    let (_dir, store, alice) = store_with_user();
    let bob = store.accounts.create("bob", &sha256_hex(b"pw")).unwrap();

    let a = store
        .documents
        .create_file(alice, "same.bin", "same", b"identical bytes")
        .unwrap();
    let b = store
        .documents
        .create_file(bob, "same.bin", "same", b"identical bytes")
        .unwrap();

    assert_ne!(
        store.documents.uuid(alice, a).unwrap(),
        store.documents.uuid(bob, b).unwrap()
    );
}

#[test]
fn zero_id_is_illegal_before_existence_is_checked() {
    let (_dir, store, user) = store_with_user();
    assert!(matches!(
        store.documents.kind(user, 0),
        Err(Error::IllegalArgument(_))
    ));
    assert!(matches!(
        store.documents.uuid(user, 0),
        Err(Error::IllegalArgument(_))
    ));
    assert!(matches!(
        store.documents.delete(user, 0),
        Err(Error::IllegalArgument(_))
    ));
    // A well-formed but unknown id is a different kind entirely.
    assert!(matches!(
        store.documents.kind(user, 999_999),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn kind_reports_each_variant() {
    let (_dir, store, user) = store_with_user();
    let file = store
        .documents
        .create_file(user, "a.txt", "", b"x")
        .unwrap();
    let note = store.documents.create_note(user, "n").unwrap();
    let url = store
        .documents
        .create_url(user, "https://example.org", "")
        .unwrap();
    let record = store.documents.create_record(user, "contact").unwrap();

    assert_eq!(store.documents.kind(user, file).unwrap(), DocumentKind::File);
    assert_eq!(store.documents.kind(user, note).unwrap(), DocumentKind::Note);
    assert_eq!(store.documents.kind(user, url).unwrap(), DocumentKind::Url);
    assert_eq!(
        store.documents.kind(user, record).unwrap(),
        DocumentKind::Record
    );
}

#[test]
fn deleting_a_document_cascades_to_every_index() {
    let (_dir, store, user) = store_with_user();
    let doomed = store
        .documents
        .create_file(user, "doomed.txt", "", b"bytes")
        .unwrap();
    let other = store.documents.create_note(user, "other").unwrap();

    let aspect = store.aspects.create(user, "work", "").unwrap();
    store.aspects.apply(user, aspect, doomed).unwrap();
    let collection = store.collections.create(user, "stuff", "").unwrap();
    store.collections.add(user, collection, doomed).unwrap();
    let briefcase = store.briefcases.create(user, "taxes", "").unwrap();
    store.briefcases.move_to(user, doomed, briefcase).unwrap();
    let predicate = store.relations.create_predicate(user, "refers-to").unwrap();
    store.relations.relate(user, doomed, other, predicate).unwrap();
    store.relations.relate(user, other, doomed, predicate).unwrap();
    store.bookmarks.set(user, doomed).unwrap();
    store
        .versions
        .save_as_next_version(user, doomed, b"more", "v1")
        .unwrap();

    assert_eq!(store.documents.delete(user, doomed).unwrap(), 1);

    assert!(!store.aspects.documents_with(user, aspect).unwrap().contains(&doomed));
    assert!(!store
        .collections
        .documents_in(user, collection)
        .unwrap()
        .contains(&doomed));
    assert!(!store
        .briefcases
        .contents(user, briefcase)
        .unwrap()
        .contains(&doomed));
    assert!(!store.bookmarks.list(user).unwrap().contains(&doomed));
    assert!(matches!(
        store.relations.exists(user, other, doomed),
        Err(Error::NotFound(_))
    ));
    assert!(!store.relations.exists(user, other, other).unwrap());

    // Re-querying the deleted document reports a missing resource.
    assert!(matches!(
        store.documents.kind(user, doomed),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        store.versions.versions(user, doomed),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        store.aspects.applied_to(user, doomed),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn extension_lookup_is_case_insensitive() {
    let (_dir, store, user) = store_with_user();
    let upper = store
        .documents
        .create_file(user, "report.PDF", "", b"a")
        .unwrap();
    let lower = store
        .documents
        .create_file(user, "summary.pdf", "", b"b")
        .unwrap();
    store
        .documents
        .create_file(user, "notes.txt", "", b"c")
        .unwrap();

    let expected: satchel_core::IdSet = [upper, lower].into_iter().collect();
    assert_eq!(store.documents.files_with_extension(user, "pdf").unwrap(), expected);
    assert_eq!(store.documents.files_with_extension(user, "PDF").unwrap(), expected);
}

#[test]
fn record_names_are_unique_and_properties_follow_naming_rules() {
    let (_dir, store, user) = store_with_user();
    let contact = store.documents.create_record(user, "contact").unwrap();
    assert!(matches!(
        store.documents.create_record(user, "contact"),
        Err(Error::DuplicateName(_))
    ));
    assert!(store.documents.record_exists(user, "contact").unwrap());
    assert!(!store.documents.record_exists(user, "unknown").unwrap());

    store
        .documents
        .add_record_property(user, contact, "email", "a@example.org")
        .unwrap();
    assert!(matches!(
        store
            .documents
            .add_record_property(user, contact, "email", "b@example.org"),
        Err(Error::DuplicateName(_))
    ));

    store
        .documents
        .update_record_property(user, contact, "email", "b@example.org")
        .unwrap();
    assert_eq!(
        store.documents.record_property(user, contact, "email").unwrap(),
        "b@example.org"
    );

    assert!(matches!(
        store
            .documents
            .update_record_property(user, contact, "phone", "123"),
        Err(Error::NotFound(_))
    ));
    store
        .documents
        .remove_record_property(user, contact, "email")
        .unwrap();
    assert!(matches!(
        store.documents.record_property(user, contact, "email"),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn detail_lookups_are_variant_checked() {
    let (_dir, store, user) = store_with_user();
    let note = store.documents.create_note(user, "text").unwrap();
    // Asking for the file details of a note reports a missing file.
    assert!(matches!(
        store.documents.file_details(user, note),
        Err(Error::NotFound(_))
    ));
    let details = store.documents.note_details(user, note).unwrap();
    assert_eq!(details.text, "text");
}

#[test]
fn name_validation_rejects_empty_and_oversized_values() {
    let (_dir, store, user) = store_with_user();
    assert!(matches!(
        store.documents.create_file(user, "", "", b"x"),
        Err(Error::IllegalArgument(_))
    ));
    let oversized = "x".repeat(satchel_core::defaults::MAX_NAME_LEN + 1);
    assert!(matches!(
        store.documents.create_record(user, &oversized),
        Err(Error::IllegalArgument(_))
    ));
    // Descriptions may be empty but not oversized.
    let long_desc = "d".repeat(satchel_core::defaults::MAX_DESC_LEN + 1);
    assert!(matches!(
        store.documents.create_file(user, "ok.txt", &long_desc, b"x"),
        Err(Error::IllegalArgument(_))
    ));
}
