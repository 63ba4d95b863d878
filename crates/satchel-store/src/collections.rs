//! Collection repository: many-to-many folders.
//!
//! Structurally the same engine as aspects (idempotent membership edges,
//! all-or-nothing bulk variants, full cascade on deletion) but kept as its
//! own index and namespace.

use std::sync::Arc;

use tracing::debug;

use satchel_core::{validate, Collection, EntityId, Error, IdSet, Result, UserId};

use crate::StoreInner;

/// Repository for collection definitions and membership edges.
pub struct CollectionRepository {
    inner: Arc<StoreInner>,
}

impl CollectionRepository {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    /// Create a collection. Names are unique per user.
    pub fn create(&self, owner: UserId, name: &str, description: &str) -> Result<EntityId> {
        validate::require_name("collection name", name)?;
        validate::require_description("collection description", description)?;
        let id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        self.inner.with_user_mut(owner, |state| {
            if state.collection_name_taken(name) {
                return Err(Error::DuplicateName(format!("collection '{}'", name)));
            }
            state.collections.insert(
                id,
                Collection {
                    id,
                    name: name.to_string(),
                    description: description.to_string(),
                    created_at: now,
                },
            );
            state.collection_docs.insert(id, IdSet::new());
            debug!(owner, id, "collections: created");
            Ok(id)
        })
    }

    pub fn get(&self, owner: UserId, id: EntityId) -> Result<Collection> {
        validate::require_id("collection id", id)?;
        self.inner
            .with_user(owner, |state| Ok(state.collection(id)?.clone()))
    }

    /// All collections of a user, ordered by name.
    pub fn list(&self, owner: UserId) -> Result<Vec<Collection>> {
        self.inner.with_user(owner, |state| {
            let mut collections: Vec<_> = state.collections.values().cloned().collect();
            collections.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(collections)
        })
    }

    pub fn exists(&self, owner: UserId, id: EntityId) -> Result<bool> {
        validate::require_id("collection id", id)?;
        self.inner
            .with_user(owner, |state| Ok(state.collections.contains_key(&id)))
    }

    pub fn rename(&self, owner: UserId, id: EntityId, name: &str) -> Result<()> {
        validate::require_id("collection id", id)?;
        validate::require_name("collection name", name)?;
        self.inner.with_user_mut(owner, |state| {
            state.collection(id)?;
            if state
                .collections
                .values()
                .any(|c| c.id != id && c.name == name)
            {
                return Err(Error::DuplicateName(format!("collection '{}'", name)));
            }
            state.collection_mut(id)?.name = name.to_string();
            Ok(())
        })
    }

    pub fn update_description(&self, owner: UserId, id: EntityId, description: &str) -> Result<()> {
        validate::require_id("collection id", id)?;
        validate::require_description("collection description", description)?;
        self.inner.with_user_mut(owner, |state| {
            state.collection_mut(id)?.description = description.to_string();
            Ok(())
        })
    }

    /// Delete a collection and every membership edge referencing it.
    pub fn delete(&self, owner: UserId, id: EntityId) -> Result<()> {
        validate::require_id("collection id", id)?;
        self.inner.with_user_mut(owner, |state| {
            state.collection(id)?;
            state.collections.remove(&id);
            if let Some(docs) = state.collection_docs.remove(&id) {
                for doc in docs {
                    if let Some(set) = state.doc_collections.get_mut(&doc) {
                        set.remove(&id);
                    }
                }
            }
            debug!(owner, id, "collections: deleted");
            Ok(())
        })
    }

    // ─── Membership edges ──────────────────────────────────────────────────

    /// Add a document to a collection. Idempotent on duplicate.
    pub fn add(&self, owner: UserId, collection: EntityId, doc: EntityId) -> Result<()> {
        validate::require_id("collection id", collection)?;
        validate::require_id("document id", doc)?;
        self.inner.with_user_mut(owner, |state| {
            state.collection(collection)?;
            state.document(doc)?;
            state.add_collection_edge(collection, doc);
            Ok(())
        })
    }

    /// Remove a document from a collection. Idempotent on absence.
    pub fn remove(&self, owner: UserId, collection: EntityId, doc: EntityId) -> Result<()> {
        validate::require_id("collection id", collection)?;
        validate::require_id("document id", doc)?;
        self.inner.with_user_mut(owner, |state| {
            state.collection(collection)?;
            state.document(doc)?;
            state.drop_collection_edge(collection, doc);
            Ok(())
        })
    }

    /// Add one document to several collections.
    pub fn add_many_to_one(
        &self,
        owner: UserId,
        collections: &[EntityId],
        doc: EntityId,
    ) -> Result<()> {
        validate::require_ids("collection ids", collections)?;
        validate::require_id("document id", doc)?;
        self.add_edge_set(owner, collections, &[doc])
    }

    /// Add several documents to one collection.
    pub fn add_one_to_many(
        &self,
        owner: UserId,
        collection: EntityId,
        docs: &[EntityId],
    ) -> Result<()> {
        validate::require_id("collection id", collection)?;
        validate::require_ids("document ids", docs)?;
        self.add_edge_set(owner, &[collection], docs)
    }

    /// Add several documents to several collections (full cross product).
    pub fn add_many_to_many(
        &self,
        owner: UserId,
        collections: &[EntityId],
        docs: &[EntityId],
    ) -> Result<()> {
        validate::require_ids("collection ids", collections)?;
        validate::require_ids("document ids", docs)?;
        self.add_edge_set(owner, collections, docs)
    }

    fn add_edge_set(
        &self,
        owner: UserId,
        collections: &[EntityId],
        docs: &[EntityId],
    ) -> Result<()> {
        self.inner.with_user_mut(owner, |state| {
            // Validate every referenced entity before writing any edge.
            for collection in collections {
                state.collection(*collection)?;
            }
            for doc in docs {
                state.document(*doc)?;
            }
            for collection in collections {
                for doc in docs {
                    state.add_collection_edge(*collection, *doc);
                }
            }
            debug!(
                owner,
                collections = collections.len(),
                docs = docs.len(),
                "collections: bulk add"
            );
            Ok(())
        })
    }

    // ─── Queries ───────────────────────────────────────────────────────────

    /// Collections a document belongs to.
    pub fn collections_of(&self, owner: UserId, doc: EntityId) -> Result<IdSet> {
        validate::require_id("document id", doc)?;
        self.inner.with_user(owner, |state| {
            state.document(doc)?;
            Ok(state.doc_collections.get(&doc).cloned().unwrap_or_default())
        })
    }

    /// Documents belonging to a collection.
    pub fn documents_in(&self, owner: UserId, collection: EntityId) -> Result<IdSet> {
        validate::require_id("collection id", collection)?;
        self.inner.with_user(owner, |state| {
            state.collection(collection)?;
            Ok(state
                .collection_docs
                .get(&collection)
                .cloned()
                .unwrap_or_default())
        })
    }
}
