//! Aspect repository: many-to-many tags over documents.
//!
//! Apply/unapply are idempotent on duplicate edges. The bulk variants
//! converge to the same edge set as repeated single calls, validate every
//! referenced id before writing any edge, and therefore either install the
//! whole edge set or none of it.

use std::sync::Arc;

use tracing::debug;

use satchel_core::{validate, Aspect, EntityId, Error, IdSet, Result, UserId};

use crate::StoreInner;

/// Repository for aspect definitions and applied edges.
pub struct AspectRepository {
    inner: Arc<StoreInner>,
}

impl AspectRepository {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    /// Create an aspect. Names are unique per user.
    pub fn create(&self, owner: UserId, name: &str, description: &str) -> Result<EntityId> {
        validate::require_name("aspect name", name)?;
        validate::require_description("aspect description", description)?;
        let id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        self.inner.with_user_mut(owner, |state| {
            if state.aspect_name_taken(name) {
                return Err(Error::DuplicateName(format!("aspect '{}'", name)));
            }
            state.aspects.insert(
                id,
                Aspect {
                    id,
                    name: name.to_string(),
                    description: description.to_string(),
                    created_at: now,
                },
            );
            state.aspect_docs.insert(id, IdSet::new());
            debug!(owner, id, "aspects: created");
            Ok(id)
        })
    }

    pub fn get(&self, owner: UserId, id: EntityId) -> Result<Aspect> {
        validate::require_id("aspect id", id)?;
        self.inner.with_user(owner, |state| Ok(state.aspect(id)?.clone()))
    }

    /// All aspects of a user, ordered by name.
    pub fn list(&self, owner: UserId) -> Result<Vec<Aspect>> {
        self.inner.with_user(owner, |state| {
            let mut aspects: Vec<_> = state.aspects.values().cloned().collect();
            aspects.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(aspects)
        })
    }

    pub fn exists(&self, owner: UserId, id: EntityId) -> Result<bool> {
        validate::require_id("aspect id", id)?;
        self.inner
            .with_user(owner, |state| Ok(state.aspects.contains_key(&id)))
    }

    pub fn exists_named(&self, owner: UserId, name: &str) -> Result<bool> {
        validate::require_name("aspect name", name)?;
        self.inner
            .with_user(owner, |state| Ok(state.aspect_name_taken(name)))
    }

    pub fn rename(&self, owner: UserId, id: EntityId, name: &str) -> Result<()> {
        validate::require_id("aspect id", id)?;
        validate::require_name("aspect name", name)?;
        self.inner.with_user_mut(owner, |state| {
            state.aspect(id)?;
            if state.aspects.values().any(|a| a.id != id && a.name == name) {
                return Err(Error::DuplicateName(format!("aspect '{}'", name)));
            }
            state.aspect_mut(id)?.name = name.to_string();
            Ok(())
        })
    }

    pub fn update_description(&self, owner: UserId, id: EntityId, description: &str) -> Result<()> {
        validate::require_id("aspect id", id)?;
        validate::require_description("aspect description", description)?;
        self.inner.with_user_mut(owner, |state| {
            state.aspect_mut(id)?.description = description.to_string();
            Ok(())
        })
    }

    /// Delete an aspect and every Applied edge referencing it.
    pub fn delete(&self, owner: UserId, id: EntityId) -> Result<()> {
        validate::require_id("aspect id", id)?;
        self.inner.with_user_mut(owner, |state| {
            state.aspect(id)?;
            state.aspects.remove(&id);
            if let Some(docs) = state.aspect_docs.remove(&id) {
                for doc in docs {
                    if let Some(set) = state.doc_aspects.get_mut(&doc) {
                        set.remove(&id);
                    }
                }
            }
            debug!(owner, id, "aspects: deleted");
            Ok(())
        })
    }

    // ─── Applied edges ─────────────────────────────────────────────────────

    /// Apply an aspect to a document. Idempotent on duplicate.
    pub fn apply(&self, owner: UserId, aspect: EntityId, doc: EntityId) -> Result<()> {
        validate::require_id("aspect id", aspect)?;
        validate::require_id("document id", doc)?;
        self.inner.with_user_mut(owner, |state| {
            state.aspect(aspect)?;
            state.document(doc)?;
            state.apply_aspect_edge(aspect, doc);
            Ok(())
        })
    }

    /// Remove an applied edge. Idempotent on absence.
    pub fn unapply(&self, owner: UserId, aspect: EntityId, doc: EntityId) -> Result<()> {
        validate::require_id("aspect id", aspect)?;
        validate::require_id("document id", doc)?;
        self.inner.with_user_mut(owner, |state| {
            state.aspect(aspect)?;
            state.document(doc)?;
            state.drop_aspect_edge(aspect, doc);
            Ok(())
        })
    }

    /// Apply several aspects to one document.
    pub fn apply_many_to_one(
        &self,
        owner: UserId,
        aspects: &[EntityId],
        doc: EntityId,
    ) -> Result<()> {
        validate::require_ids("aspect ids", aspects)?;
        validate::require_id("document id", doc)?;
        self.apply_edge_set(owner, aspects, &[doc])
    }

    /// Apply one aspect to several documents.
    pub fn apply_one_to_many(
        &self,
        owner: UserId,
        aspect: EntityId,
        docs: &[EntityId],
    ) -> Result<()> {
        validate::require_id("aspect id", aspect)?;
        validate::require_ids("document ids", docs)?;
        self.apply_edge_set(owner, &[aspect], docs)
    }

    /// Apply several aspects to several documents (full cross product).
    pub fn apply_many_to_many(
        &self,
        owner: UserId,
        aspects: &[EntityId],
        docs: &[EntityId],
    ) -> Result<()> {
        validate::require_ids("aspect ids", aspects)?;
        validate::require_ids("document ids", docs)?;
        self.apply_edge_set(owner, aspects, docs)
    }

    fn apply_edge_set(&self, owner: UserId, aspects: &[EntityId], docs: &[EntityId]) -> Result<()> {
        self.inner.with_user_mut(owner, |state| {
            // Validate every referenced entity before writing any edge.
            for aspect in aspects {
                state.aspect(*aspect)?;
            }
            for doc in docs {
                state.document(*doc)?;
            }
            for aspect in aspects {
                for doc in docs {
                    state.apply_aspect_edge(*aspect, *doc);
                }
            }
            debug!(
                owner,
                aspects = aspects.len(),
                docs = docs.len(),
                "aspects: bulk apply"
            );
            Ok(())
        })
    }

    // ─── Queries ───────────────────────────────────────────────────────────

    /// Aspects applied to a document.
    pub fn applied_to(&self, owner: UserId, doc: EntityId) -> Result<IdSet> {
        validate::require_id("document id", doc)?;
        self.inner.with_user(owner, |state| {
            state.document(doc)?;
            Ok(state.doc_aspects.get(&doc).cloned().unwrap_or_default())
        })
    }

    /// Documents an aspect is applied to.
    pub fn documents_with(&self, owner: UserId, aspect: EntityId) -> Result<IdSet> {
        validate::require_id("aspect id", aspect)?;
        self.inner.with_user(owner, |state| {
            state.aspect(aspect)?;
            Ok(state.aspect_docs.get(&aspect).cloned().unwrap_or_default())
        })
    }
}
