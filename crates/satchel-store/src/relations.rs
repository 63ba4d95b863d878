//! Relation store: predicates and the subject-predicate-object triple index.
//!
//! Predicates are user-defined named entities; relations link two live
//! documents under a predicate. Self-relations are permitted and multiple
//! predicates may hold between the same ordered pair. Each referenced
//! entity is existence-checked independently so the most specific missing
//! entity is the one reported.

use std::sync::Arc;

use tracing::debug;

use satchel_core::{validate, EntityId, Error, IdSet, Predicate, Result, UserId};

use crate::StoreInner;

/// Repository for predicates and relations.
pub struct RelationRepository {
    inner: Arc<StoreInner>,
}

impl RelationRepository {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    // ─── Predicates ────────────────────────────────────────────────────────

    /// Create a predicate. Labels are unique per user.
    pub fn create_predicate(&self, owner: UserId, label: &str) -> Result<EntityId> {
        validate::require_name("predicate label", label)?;
        let id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        self.inner.with_user_mut(owner, |state| {
            if state.predicate_label_taken(label) {
                return Err(Error::DuplicateName(format!("predicate '{}'", label)));
            }
            state.predicates.insert(
                id,
                Predicate {
                    id,
                    label: label.to_string(),
                    created_at: now,
                },
            );
            debug!(owner, id, "relations: predicate created");
            Ok(id)
        })
    }

    pub fn predicate(&self, owner: UserId, id: EntityId) -> Result<Predicate> {
        validate::require_id("predicate id", id)?;
        self.inner
            .with_user(owner, |state| Ok(state.predicate(id)?.clone()))
    }

    /// All predicates of a user, ordered by label.
    pub fn predicates(&self, owner: UserId) -> Result<Vec<Predicate>> {
        self.inner.with_user(owner, |state| {
            let mut predicates: Vec<_> = state.predicates.values().cloned().collect();
            predicates.sort_by(|a, b| a.label.cmp(&b.label));
            Ok(predicates)
        })
    }

    pub fn predicate_exists(&self, owner: UserId, id: EntityId) -> Result<bool> {
        validate::require_id("predicate id", id)?;
        self.inner
            .with_user(owner, |state| Ok(state.predicates.contains_key(&id)))
    }

    pub fn rename_predicate(&self, owner: UserId, id: EntityId, label: &str) -> Result<()> {
        validate::require_id("predicate id", id)?;
        validate::require_name("predicate label", label)?;
        self.inner.with_user_mut(owner, |state| {
            state.predicate(id)?;
            if state
                .predicates
                .values()
                .any(|p| p.id != id && p.label == label)
            {
                return Err(Error::DuplicateName(format!("predicate '{}'", label)));
            }
            state.predicate_mut(id)?.label = label.to_string();
            Ok(())
        })
    }

    /// Delete a predicate and every relation installed under it.
    pub fn delete_predicate(&self, owner: UserId, id: EntityId) -> Result<()> {
        validate::require_id("predicate id", id)?;
        self.inner.with_user_mut(owner, |state| {
            state.predicate(id)?;
            state.predicates.remove(&id);
            state.relations.retain(|_, preds| {
                preds.remove(&id);
                !preds.is_empty()
            });
            debug!(owner, id, "relations: predicate deleted");
            Ok(())
        })
    }

    // ─── Triples ───────────────────────────────────────────────────────────

    /// Install a relation. Returns `true` when the triple was newly
    /// installed, `false` when it already existed.
    pub fn relate(
        &self,
        owner: UserId,
        subject: EntityId,
        object: EntityId,
        predicate: EntityId,
    ) -> Result<bool> {
        Self::require_triple_ids(subject, object, predicate)?;
        self.inner.with_user_mut(owner, |state| {
            state.document(subject)?;
            state.document(object)?;
            state.predicate(predicate)?;
            let inserted = state
                .relations
                .entry((subject, object))
                .or_default()
                .insert(predicate);
            debug!(owner, subject, object, predicate, inserted, "relations: relate");
            Ok(inserted)
        })
    }

    /// Whether any predicate holds between the ordered pair.
    pub fn exists(&self, owner: UserId, subject: EntityId, object: EntityId) -> Result<bool> {
        validate::require_id("subject id", subject)?;
        validate::require_id("object id", object)?;
        self.inner.with_user(owner, |state| {
            state.document(subject)?;
            state.document(object)?;
            Ok(state
                .relations
                .get(&(subject, object))
                .map(|preds| !preds.is_empty())
                .unwrap_or(false))
        })
    }

    /// Whether the specific predicate holds between the ordered pair.
    pub fn specific_exists(
        &self,
        owner: UserId,
        subject: EntityId,
        object: EntityId,
        predicate: EntityId,
    ) -> Result<bool> {
        Self::require_triple_ids(subject, object, predicate)?;
        self.inner.with_user(owner, |state| {
            state.document(subject)?;
            state.document(object)?;
            state.predicate(predicate)?;
            Ok(state
                .relations
                .get(&(subject, object))
                .map(|preds| preds.contains(&predicate))
                .unwrap_or(false))
        })
    }

    /// Exactly the set of predicate ids installed between the ordered pair,
    /// unaffected by creation order.
    pub fn predicates_between(
        &self,
        owner: UserId,
        subject: EntityId,
        object: EntityId,
    ) -> Result<IdSet> {
        validate::require_id("subject id", subject)?;
        validate::require_id("object id", object)?;
        self.inner.with_user(owner, |state| {
            state.document(subject)?;
            state.document(object)?;
            Ok(state
                .relations
                .get(&(subject, object))
                .cloned()
                .unwrap_or_default())
        })
    }

    /// Remove one predicate edge from the ordered pair. Removing an edge
    /// that is not installed is a no-op.
    pub fn remove_specific(
        &self,
        owner: UserId,
        subject: EntityId,
        object: EntityId,
        predicate: EntityId,
    ) -> Result<()> {
        Self::require_triple_ids(subject, object, predicate)?;
        self.inner.with_user_mut(owner, |state| {
            state.document(subject)?;
            state.document(object)?;
            state.predicate(predicate)?;
            if let Some(preds) = state.relations.get_mut(&(subject, object)) {
                preds.remove(&predicate);
                if preds.is_empty() {
                    state.relations.remove(&(subject, object));
                }
            }
            Ok(())
        })
    }

    /// Remove every predicate edge from the ordered pair.
    pub fn remove_all(&self, owner: UserId, subject: EntityId, object: EntityId) -> Result<()> {
        validate::require_id("subject id", subject)?;
        validate::require_id("object id", object)?;
        self.inner.with_user_mut(owner, |state| {
            state.document(subject)?;
            state.document(object)?;
            state.relations.remove(&(subject, object));
            Ok(())
        })
    }

    fn require_triple_ids(subject: EntityId, object: EntityId, predicate: EntityId) -> Result<()> {
        validate::require_id("subject id", subject)?;
        validate::require_id("object id", object)?;
        validate::require_id("predicate id", predicate)?;
        Ok(())
    }
}
