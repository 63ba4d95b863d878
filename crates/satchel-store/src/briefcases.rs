//! Briefcase repository: exclusive, single-parent filing.
//!
//! The per-document state machine has exactly two states, *InGlobal* and
//! *InBriefcase(b)*. `move_to` transitions either state to *InBriefcase(b)*,
//! `move_to_global` transitions any state back to *InGlobal*, and deleting a
//! briefcase forces its contents back to *InGlobal*. The Global Briefcase
//! itself is created with the account and cannot be deleted, so
//! `containing(doc)` always resolves to a live briefcase.

use std::sync::Arc;

use tracing::debug;

use satchel_core::{validate, Briefcase, EntityId, Error, IdSet, Result, UserId};

use crate::StoreInner;

/// Repository for briefcase definitions and document filing.
pub struct BriefcaseRepository {
    inner: Arc<StoreInner>,
}

impl BriefcaseRepository {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    /// Create a briefcase. Names are unique per user; "Global" is therefore
    /// always taken.
    pub fn create(&self, owner: UserId, name: &str, description: &str) -> Result<EntityId> {
        validate::require_name("briefcase name", name)?;
        validate::require_description("briefcase description", description)?;
        let id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        self.inner.with_user_mut(owner, |state| {
            if state.briefcase_name_taken(name) {
                return Err(Error::DuplicateName(format!("briefcase '{}'", name)));
            }
            state.briefcases.insert(
                id,
                Briefcase {
                    id,
                    name: name.to_string(),
                    description: description.to_string(),
                    created_at: now,
                },
            );
            state.briefcase_docs.insert(id, IdSet::new());
            debug!(owner, id, "briefcases: created");
            Ok(id)
        })
    }

    pub fn get(&self, owner: UserId, id: EntityId) -> Result<Briefcase> {
        validate::require_id("briefcase id", id)?;
        self.inner
            .with_user(owner, |state| Ok(state.briefcase(id)?.clone()))
    }

    /// All briefcases of a user, ordered by name.
    pub fn list(&self, owner: UserId) -> Result<Vec<Briefcase>> {
        self.inner.with_user(owner, |state| {
            let mut briefcases: Vec<_> = state.briefcases.values().cloned().collect();
            briefcases.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(briefcases)
        })
    }

    pub fn exists(&self, owner: UserId, id: EntityId) -> Result<bool> {
        validate::require_id("briefcase id", id)?;
        self.inner
            .with_user(owner, |state| Ok(state.briefcases.contains_key(&id)))
    }

    /// Id of the user's Global Briefcase.
    pub fn global_id(&self, owner: UserId) -> Result<EntityId> {
        self.inner.with_user(owner, |state| Ok(state.global_briefcase))
    }

    pub fn rename(&self, owner: UserId, id: EntityId, name: &str) -> Result<()> {
        validate::require_id("briefcase id", id)?;
        validate::require_name("briefcase name", name)?;
        self.inner.with_user_mut(owner, |state| {
            state.briefcase(id)?;
            if id == state.global_briefcase {
                return Err(Error::IllegalOperation(
                    "the Global Briefcase cannot be renamed".into(),
                ));
            }
            if state.briefcases.values().any(|b| b.id != id && b.name == name) {
                return Err(Error::DuplicateName(format!("briefcase '{}'", name)));
            }
            state.briefcase_mut(id)?.name = name.to_string();
            Ok(())
        })
    }

    pub fn update_description(&self, owner: UserId, id: EntityId, description: &str) -> Result<()> {
        validate::require_id("briefcase id", id)?;
        validate::require_description("briefcase description", description)?;
        self.inner.with_user_mut(owner, |state| {
            state.briefcase_mut(id)?.description = description.to_string();
            Ok(())
        })
    }

    /// Delete a briefcase. Its contents move back to the Global Briefcase;
    /// the Global Briefcase itself is non-deletable.
    pub fn delete(&self, owner: UserId, id: EntityId) -> Result<()> {
        validate::require_id("briefcase id", id)?;
        self.inner.with_user_mut(owner, |state| {
            state.briefcase(id)?;
            if id == state.global_briefcase {
                return Err(Error::IllegalOperation(
                    "the Global Briefcase cannot be deleted".into(),
                ));
            }
            let evicted = state.briefcase_docs.remove(&id).unwrap_or_default();
            state.briefcases.remove(&id);
            let global = state.global_briefcase;
            for doc in &evicted {
                state.file_into(*doc, global);
            }
            debug!(owner, id, evicted = evicted.len(), "briefcases: deleted");
            Ok(())
        })
    }

    // ─── Filing ────────────────────────────────────────────────────────────

    /// File a document into a briefcase, from whichever briefcase held it.
    pub fn move_to(&self, owner: UserId, doc: EntityId, briefcase: EntityId) -> Result<()> {
        validate::require_id("document id", doc)?;
        validate::require_id("briefcase id", briefcase)?;
        self.inner.with_user_mut(owner, |state| {
            state.document(doc)?;
            state.briefcase(briefcase)?;
            state.file_into(doc, briefcase);
            Ok(())
        })
    }

    /// Evict a document back to the Global Briefcase.
    pub fn move_to_global(&self, owner: UserId, doc: EntityId) -> Result<()> {
        validate::require_id("document id", doc)?;
        self.inner.with_user_mut(owner, |state| {
            state.document(doc)?;
            let global = state.global_briefcase;
            state.file_into(doc, global);
            Ok(())
        })
    }

    /// The briefcase containing a document. Always defined for a live
    /// document.
    pub fn containing(&self, owner: UserId, doc: EntityId) -> Result<EntityId> {
        validate::require_id("document id", doc)?;
        self.inner.with_user(owner, |state| {
            state.document(doc)?;
            state
                .filing
                .get(&doc)
                .copied()
                .ok_or_else(|| Error::NotFound(format!("filing of document {}", doc)))
        })
    }

    /// Documents filed in a briefcase.
    pub fn contents(&self, owner: UserId, briefcase: EntityId) -> Result<IdSet> {
        validate::require_id("briefcase id", briefcase)?;
        self.inner.with_user(owner, |state| {
            state.briefcase(briefcase)?;
            Ok(state
                .briefcase_docs
                .get(&briefcase)
                .cloned()
                .unwrap_or_default())
        })
    }
}
