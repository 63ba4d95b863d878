//! Bookmark index: a flag set over document ids.

use std::sync::Arc;

use satchel_core::{validate, EntityId, IdSet, Result, UserId};

use crate::StoreInner;

/// Repository for document bookmarks.
pub struct BookmarkRepository {
    inner: Arc<StoreInner>,
}

impl BookmarkRepository {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    /// Flag a document. Idempotent on duplicate.
    pub fn set(&self, owner: UserId, doc: EntityId) -> Result<()> {
        validate::require_id("document id", doc)?;
        self.inner.with_user_mut(owner, |state| {
            state.document(doc)?;
            state.bookmarks.insert(doc);
            Ok(())
        })
    }

    /// Unflag a document. Idempotent on absence.
    pub fn unset(&self, owner: UserId, doc: EntityId) -> Result<()> {
        validate::require_id("document id", doc)?;
        self.inner.with_user_mut(owner, |state| {
            state.document(doc)?;
            state.bookmarks.remove(&doc);
            Ok(())
        })
    }

    /// Whether a document is flagged.
    pub fn is_set(&self, owner: UserId, doc: EntityId) -> Result<bool> {
        validate::require_id("document id", doc)?;
        self.inner.with_user(owner, |state| {
            state.document(doc)?;
            Ok(state.bookmarks.contains(&doc))
        })
    }

    /// All flagged document ids.
    pub fn list(&self, owner: UserId) -> Result<IdSet> {
        self.inner.with_user(owner, |state| Ok(state.bookmarks.clone()))
    }
}
