//! Tests for the grouping engine.
//!
//! This test suite validates:
//! - The two-state briefcase machine (*InGlobal* / *InBriefcase(b)*) and
//!   relocation on briefcase deletion
//! - The non-deletable Global Briefcase
//! - Idempotent aspect/collection edges and the convergence of bulk apply
//!   variants with repeated single calls
//! - All-or-nothing bulk failure and empty-list rejection

use satchel_core::{sha256_hex, Error};
use satchel_store::Store;

fn store_with_user() -> (tempfile::TempDir, Store, u64) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("store")).unwrap();
    let user = store
        .accounts
        .create("alice", &sha256_hex(b"pw"))
        .unwrap();
    (dir, store, user)
}

#[test]
fn documents_start_in_the_global_briefcase() {
    let (_dir, store, user) = store_with_user();
    let global = store.briefcases.global_id(user).unwrap();
    let note = store.documents.create_note(user, "hello").unwrap();
    assert_eq!(store.briefcases.containing(user, note).unwrap(), global);
    assert!(store.briefcases.contents(user, global).unwrap().contains(&note));
}

#[test]
fn move_to_and_back_transitions_both_states() {
    let (_dir, store, user) = store_with_user();
    let global = store.briefcases.global_id(user).unwrap();
    let taxes = store.briefcases.create(user, "taxes", "2026").unwrap();
    let other = store.briefcases.create(user, "other", "").unwrap();
    let note = store.documents.create_note(user, "receipt").unwrap();

    store.briefcases.move_to(user, note, taxes).unwrap();
    assert_eq!(store.briefcases.containing(user, note).unwrap(), taxes);

    // InBriefcase -> InBriefcase(b')
    store.briefcases.move_to(user, note, other).unwrap();
    assert_eq!(store.briefcases.containing(user, note).unwrap(), other);
    assert!(!store.briefcases.contents(user, taxes).unwrap().contains(&note));

    store.briefcases.move_to_global(user, note).unwrap();
    assert_eq!(store.briefcases.containing(user, note).unwrap(), global);
}

#[test]
fn deleting_a_briefcase_relocates_contents_to_global() {
    let (_dir, store, user) = store_with_user();
    let global = store.briefcases.global_id(user).unwrap();
    let taxes = store.briefcases.create(user, "taxes", "").unwrap();
    let a = store.documents.create_note(user, "a").unwrap();
    let b = store.documents.create_note(user, "b").unwrap();
    store.briefcases.move_to(user, a, taxes).unwrap();
    store.briefcases.move_to(user, b, taxes).unwrap();

    store.briefcases.delete(user, taxes).unwrap();

    for doc in [a, b] {
        assert_eq!(store.briefcases.containing(user, doc).unwrap(), global);
    }
    assert!(matches!(
        store.briefcases.get(user, taxes),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn the_global_briefcase_is_not_deletable() {
    let (_dir, store, user) = store_with_user();
    let global = store.briefcases.global_id(user).unwrap();
    assert!(matches!(
        store.briefcases.delete(user, global),
        Err(Error::IllegalOperation(_))
    ));
    // Its name is also permanently taken.
    assert!(matches!(
        store.briefcases.create(user, "Global", ""),
        Err(Error::DuplicateName(_))
    ));
}

#[test]
fn bulk_apply_converges_with_single_calls() {
    let (_dir, store, user) = store_with_user();
    let aspects: Vec<_> = (0..3)
        .map(|i| store.aspects.create(user, &format!("a{}", i), "").unwrap())
        .collect();
    let docs: Vec<_> = (0..4)
        .map(|i| store.documents.create_note(user, &format!("n{}", i)).unwrap())
        .collect();

    store.aspects.apply_many_to_many(user, &aspects, &docs).unwrap();

    // Every document carries exactly the N aspects; every aspect exactly
    // the M documents.
    for doc in &docs {
        let applied = store.aspects.applied_to(user, *doc).unwrap();
        assert_eq!(applied, aspects.iter().copied().collect());
    }
    for aspect in &aspects {
        let tagged = store.aspects.documents_with(user, *aspect).unwrap();
        assert_eq!(tagged, docs.iter().copied().collect());
    }

    // Re-running the bulk call and repeating single calls changes nothing.
    store.aspects.apply_many_to_many(user, &aspects, &docs).unwrap();
    store.aspects.apply(user, aspects[0], docs[0]).unwrap();
    store.aspects.apply_many_to_one(user, &aspects, docs[1]).unwrap();
    store.aspects.apply_one_to_many(user, aspects[2], &docs).unwrap();
    for doc in &docs {
        assert_eq!(
            store.aspects.applied_to(user, *doc).unwrap().len(),
            aspects.len()
        );
    }
}

#[test]
fn bulk_apply_is_all_or_nothing() {
    let (_dir, store, user) = store_with_user();
    let aspect = store.aspects.create(user, "work", "").unwrap();
    let good = store.documents.create_note(user, "good").unwrap();
    let bogus = good + 1000;

    let err = store
        .aspects
        .apply_one_to_many(user, aspect, &[good, bogus])
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    // The valid member must not have been tagged.
    assert!(store.aspects.applied_to(user, good).unwrap().is_empty());
}

#[test]
fn bulk_apply_rejects_empty_lists() {
    let (_dir, store, user) = store_with_user();
    let aspect = store.aspects.create(user, "work", "").unwrap();
    let doc = store.documents.create_note(user, "n").unwrap();

    assert!(matches!(
        store.aspects.apply_many_to_one(user, &[], doc),
        Err(Error::IllegalArgument(_))
    ));
    assert!(matches!(
        store.aspects.apply_one_to_many(user, aspect, &[]),
        Err(Error::IllegalArgument(_))
    ));
    assert!(matches!(
        store.collections.add_many_to_many(user, &[], &[doc]),
        Err(Error::IllegalArgument(_))
    ));
}

#[test]
fn collection_edges_mirror_aspect_semantics() {
    let (_dir, store, user) = store_with_user();
    let holidays = store.collections.create(user, "holidays", "").unwrap();
    let a = store.documents.create_note(user, "a").unwrap();
    let b = store.documents.create_note(user, "b").unwrap();

    store.collections.add_one_to_many(user, holidays, &[a, b]).unwrap();
    store.collections.add(user, holidays, a).unwrap(); // idempotent

    assert_eq!(
        store.collections.documents_in(user, holidays).unwrap(),
        [a, b].into_iter().collect()
    );

    store.collections.remove(user, holidays, a).unwrap();
    assert_eq!(
        store.collections.documents_in(user, holidays).unwrap(),
        [b].into_iter().collect()
    );
}

#[test]
fn deleting_an_aspect_drops_every_applied_edge() {
    let (_dir, store, user) = store_with_user();
    let work = store.aspects.create(user, "work", "").unwrap();
    let play = store.aspects.create(user, "play", "").unwrap();
    let doc = store.documents.create_note(user, "n").unwrap();
    store.aspects.apply_many_to_one(user, &[work, play], doc).unwrap();

    store.aspects.delete(user, work).unwrap();

    assert_eq!(
        store.aspects.applied_to(user, doc).unwrap(),
        [play].into_iter().collect()
    );
    assert!(matches!(
        store.aspects.documents_with(user, work),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn duplicate_grouping_names_are_rejected_per_user() {
    let (_dir, store, user) = store_with_user();
    store.aspects.create(user, "work", "").unwrap();
    assert!(matches!(
        store.aspects.create(user, "work", "other"),
        Err(Error::DuplicateName(_))
    ));

    // A second user may reuse the name.
    let other = store.accounts.create("bob", &sha256_hex(b"pw")).unwrap();
    assert!(store.aspects.create(other, "work", "").is_ok());
}
