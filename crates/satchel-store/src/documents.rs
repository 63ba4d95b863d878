//! Document Registry.
//!
//! The canonical store of documents, polymorphic over File, Note, Url and
//! Record. Owns create/read/update/delete and the cross-variant capability
//! surface (kind introspection, stable UUID, cascading deletion). Every
//! created document is filed into the owner's Global Briefcase.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use satchel_core::{
    document_uuid, file_extension, validate, Document, DocumentBody, DocumentKind, EntityId,
    Error, FileDetails, FileVersion, IdSet, NoteDetails, RecordDetails, Result, UrlDetails, UserId,
};

use crate::fsio;
use crate::StoreInner;

/// Repository for document CRUD and cross-variant operations.
pub struct DocumentRepository {
    inner: Arc<StoreInner>,
}

impl DocumentRepository {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    // ─── Creation ──────────────────────────────────────────────────────────

    /// Create a file document. `content` becomes version 0 of its history.
    pub fn create_file(
        &self,
        owner: UserId,
        name: &str,
        narration: &str,
        content: &[u8],
    ) -> Result<EntityId> {
        validate::require_name("file name", name)?;
        validate::require_description("narration", narration)?;

        let id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        let hash = self.inner.hasher.digest_hex(content);
        let inner = Arc::clone(&self.inner);
        let size = content.len() as u64;
        self.inner.with_user_mut(owner, move |state| {
            fsio::write_atomic(&inner.blob_path(owner, id, 0), content)?;
            state.documents.insert(
                id,
                Document {
                    id,
                    created_at: now,
                    body: DocumentBody::File {
                        name: name.to_string(),
                        narration: narration.to_string(),
                        current_version: 0,
                    },
                },
            );
            state.versions.insert(
                id,
                vec![FileVersion {
                    version: 0,
                    content_hash: hash,
                    comment: String::new(),
                    size_bytes: size,
                    created_at: now,
                }],
            );
            let global = state.global_briefcase;
            state.file_into(id, global);
            debug!(owner, id, "documents: file created");
            Ok(id)
        })
    }

    /// Create a free-text note.
    pub fn create_note(&self, owner: UserId, text: &str) -> Result<EntityId> {
        if text.is_empty() {
            return Err(Error::IllegalArgument("note text must not be empty".into()));
        }
        let id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        self.inner.with_user_mut(owner, |state| {
            state.documents.insert(
                id,
                Document {
                    id,
                    created_at: now,
                    body: DocumentBody::Note {
                        text: text.to_string(),
                    },
                },
            );
            let global = state.global_briefcase;
            state.file_into(id, global);
            debug!(owner, id, "documents: note created");
            Ok(id)
        })
    }

    /// Create a url document.
    pub fn create_url(&self, owner: UserId, url: &str, description: &str) -> Result<EntityId> {
        validate::require_url("url", url)?;
        validate::require_description("description", description)?;
        let id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        self.inner.with_user_mut(owner, |state| {
            state.documents.insert(
                id,
                Document {
                    id,
                    created_at: now,
                    body: DocumentBody::Url {
                        url: url.to_string(),
                        description: description.to_string(),
                    },
                },
            );
            let global = state.global_briefcase;
            state.file_into(id, global);
            debug!(owner, id, "documents: url created");
            Ok(id)
        })
    }

    /// Create a schema-free record. Record names are unique per user.
    pub fn create_record(&self, owner: UserId, name: &str) -> Result<EntityId> {
        validate::require_name("record name", name)?;
        let id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        self.inner.with_user_mut(owner, |state| {
            if state.record_name_taken(name) {
                return Err(Error::DuplicateName(format!("record '{}'", name)));
            }
            state.documents.insert(
                id,
                Document {
                    id,
                    created_at: now,
                    body: DocumentBody::Record {
                        name: name.to_string(),
                        properties: Default::default(),
                    },
                },
            );
            let global = state.global_briefcase;
            state.file_into(id, global);
            debug!(owner, id, "documents: record created");
            Ok(id)
        })
    }

    // ─── Cross-variant operations ──────────────────────────────────────────

    /// Check whether a document exists, regardless of variant.
    pub fn exists(&self, owner: UserId, id: EntityId) -> Result<bool> {
        validate::require_id("document id", id)?;
        self.inner
            .with_user(owner, |state| Ok(state.documents.contains_key(&id)))
    }

    /// Variant of a live document.
    pub fn kind(&self, owner: UserId, id: EntityId) -> Result<DocumentKind> {
        validate::require_id("document id", id)?;
        self.inner.with_user(owner, |state| Ok(state.document(id)?.kind()))
    }

    /// Stable, owner-scoped UUID of a live document.
    pub fn uuid(&self, owner: UserId, id: EntityId) -> Result<String> {
        validate::require_id("document id", id)?;
        self.inner.with_user(owner, |state| {
            state.document(id)?;
            Ok(document_uuid(owner, id).to_string())
        })
    }

    /// Delete a document of any variant. Cascades to applied aspects,
    /// collection membership, briefcase filing, relations, bookmarks and
    /// version history. Returns the number of documents removed.
    pub fn delete(&self, owner: UserId, id: EntityId) -> Result<u64> {
        validate::require_id("document id", id)?;
        let inner = Arc::clone(&self.inner);
        self.inner.with_user_mut(owner, move |state| {
            let doc = state.document(id)?;
            let was_file = doc.kind() == DocumentKind::File;
            state.documents.remove(&id);

            if let Some(aspects) = state.doc_aspects.remove(&id) {
                for aspect in aspects {
                    if let Some(set) = state.aspect_docs.get_mut(&aspect) {
                        set.remove(&id);
                    }
                }
            }
            if let Some(collections) = state.doc_collections.remove(&id) {
                for collection in collections {
                    if let Some(set) = state.collection_docs.get_mut(&collection) {
                        set.remove(&id);
                    }
                }
            }
            if let Some(briefcase) = state.filing.remove(&id) {
                if let Some(set) = state.briefcase_docs.get_mut(&briefcase) {
                    set.remove(&id);
                }
            }
            state.relations.retain(|(s, o), _| *s != id && *o != id);
            state.bookmarks.remove(&id);
            state.versions.remove(&id);

            if was_file {
                let dir = inner.blob_dir(owner, id);
                if let Err(e) = fsio::remove_tree(&dir) {
                    warn!(owner, id, error = %e, "documents: blob cleanup failed");
                }
            }
            debug!(owner, id, "documents: deleted");
            Ok(1)
        })
    }

    /// All live document ids of a user: the universe for invert queries.
    pub fn all(&self, owner: UserId) -> Result<IdSet> {
        self.inner
            .with_user(owner, |state| Ok(state.documents.keys().copied().collect()))
    }

    /// Documents created inside the inclusive timestamp range.
    pub fn created_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<IdSet> {
        self.inner.with_user(owner, |state| {
            Ok(state
                .documents
                .values()
                .filter(|d| d.created_at >= from && d.created_at <= to)
                .map(|d| d.id)
                .collect())
        })
    }

    // ─── File operations ───────────────────────────────────────────────────

    pub fn file_details(&self, owner: UserId, id: EntityId) -> Result<FileDetails> {
        validate::require_id("document id", id)?;
        self.inner.with_user(owner, |state| {
            let doc = state.typed(id, DocumentKind::File)?;
            match &doc.body {
                DocumentBody::File {
                    name,
                    narration,
                    current_version,
                } => Ok(FileDetails {
                    id,
                    name: name.clone(),
                    narration: narration.clone(),
                    extension: file_extension(name),
                    current_version: *current_version,
                    created_at: doc.created_at,
                }),
                _ => unreachable!("typed() guarantees a file body"),
            }
        })
    }

    pub fn rename_file(&self, owner: UserId, id: EntityId, name: &str) -> Result<()> {
        validate::require_id("document id", id)?;
        validate::require_name("file name", name)?;
        self.inner.with_user_mut(owner, |state| {
            let doc = state.typed_mut(id, DocumentKind::File)?;
            if let DocumentBody::File { name: n, .. } = &mut doc.body {
                *n = name.to_string();
            }
            Ok(())
        })
    }

    pub fn update_narration(&self, owner: UserId, id: EntityId, narration: &str) -> Result<()> {
        validate::require_id("document id", id)?;
        validate::require_description("narration", narration)?;
        self.inner.with_user_mut(owner, |state| {
            let doc = state.typed_mut(id, DocumentKind::File)?;
            if let DocumentBody::File { narration: n, .. } = &mut doc.body {
                *n = narration.to_string();
            }
            Ok(())
        })
    }

    /// All file document ids of a user.
    pub fn files(&self, owner: UserId) -> Result<IdSet> {
        self.inner.with_user(owner, |state| {
            Ok(state
                .documents
                .values()
                .filter(|d| d.kind() == DocumentKind::File)
                .map(|d| d.id)
                .collect())
        })
    }

    /// Files whose extension matches `ext`, case-insensitively. The leading
    /// dot is not part of the extension.
    pub fn files_with_extension(&self, owner: UserId, ext: &str) -> Result<IdSet> {
        let wanted = ext.to_ascii_lowercase();
        self.inner.with_user(owner, |state| {
            Ok(state
                .documents
                .values()
                .filter(|d| {
                    matches!(&d.body, DocumentBody::File { name, .. }
                        if file_extension(name) == wanted)
                })
                .map(|d| d.id)
                .collect())
        })
    }

    // ─── Note operations ───────────────────────────────────────────────────

    pub fn note_details(&self, owner: UserId, id: EntityId) -> Result<NoteDetails> {
        validate::require_id("document id", id)?;
        self.inner.with_user(owner, |state| {
            let doc = state.typed(id, DocumentKind::Note)?;
            match &doc.body {
                DocumentBody::Note { text } => Ok(NoteDetails {
                    id,
                    text: text.clone(),
                    created_at: doc.created_at,
                }),
                _ => unreachable!("typed() guarantees a note body"),
            }
        })
    }

    pub fn update_note_text(&self, owner: UserId, id: EntityId, text: &str) -> Result<()> {
        validate::require_id("document id", id)?;
        if text.is_empty() {
            return Err(Error::IllegalArgument("note text must not be empty".into()));
        }
        self.inner.with_user_mut(owner, |state| {
            let doc = state.typed_mut(id, DocumentKind::Note)?;
            if let DocumentBody::Note { text: t } = &mut doc.body {
                *t = text.to_string();
            }
            Ok(())
        })
    }

    // ─── Url operations ────────────────────────────────────────────────────

    pub fn url_details(&self, owner: UserId, id: EntityId) -> Result<UrlDetails> {
        validate::require_id("document id", id)?;
        self.inner.with_user(owner, |state| {
            let doc = state.typed(id, DocumentKind::Url)?;
            match &doc.body {
                DocumentBody::Url { url, description } => Ok(UrlDetails {
                    id,
                    url: url.clone(),
                    description: description.clone(),
                    created_at: doc.created_at,
                }),
                _ => unreachable!("typed() guarantees a url body"),
            }
        })
    }

    pub fn update_url(&self, owner: UserId, id: EntityId, url: &str) -> Result<()> {
        validate::require_id("document id", id)?;
        validate::require_url("url", url)?;
        self.inner.with_user_mut(owner, |state| {
            let doc = state.typed_mut(id, DocumentKind::Url)?;
            if let DocumentBody::Url { url: u, .. } = &mut doc.body {
                *u = url.to_string();
            }
            Ok(())
        })
    }

    pub fn update_url_description(
        &self,
        owner: UserId,
        id: EntityId,
        description: &str,
    ) -> Result<()> {
        validate::require_id("document id", id)?;
        validate::require_description("description", description)?;
        self.inner.with_user_mut(owner, |state| {
            let doc = state.typed_mut(id, DocumentKind::Url)?;
            if let DocumentBody::Url { description: d, .. } = &mut doc.body {
                *d = description.to_string();
            }
            Ok(())
        })
    }

    // ─── Record operations ─────────────────────────────────────────────────

    pub fn record_details(&self, owner: UserId, id: EntityId) -> Result<RecordDetails> {
        validate::require_id("document id", id)?;
        self.inner.with_user(owner, |state| {
            let doc = state.typed(id, DocumentKind::Record)?;
            match &doc.body {
                DocumentBody::Record { name, properties } => Ok(RecordDetails {
                    id,
                    name: name.clone(),
                    properties: properties.clone(),
                    created_at: doc.created_at,
                }),
                _ => unreachable!("typed() guarantees a record body"),
            }
        })
    }

    /// Check whether a record with the given name exists.
    pub fn record_exists(&self, owner: UserId, name: &str) -> Result<bool> {
        validate::require_name("record name", name)?;
        self.inner
            .with_user(owner, |state| Ok(state.record_name_taken(name)))
    }

    pub fn rename_record(&self, owner: UserId, id: EntityId, name: &str) -> Result<()> {
        validate::require_id("document id", id)?;
        validate::require_name("record name", name)?;
        self.inner.with_user_mut(owner, |state| {
            state.typed(id, DocumentKind::Record)?;
            let taken_by_other = state.documents.values().any(|d| {
                d.id != id
                    && matches!(&d.body, DocumentBody::Record { name: n, .. } if n == name)
            });
            if taken_by_other {
                return Err(Error::DuplicateName(format!("record '{}'", name)));
            }
            let doc = state.typed_mut(id, DocumentKind::Record)?;
            if let DocumentBody::Record { name: n, .. } = &mut doc.body {
                *n = name.to_string();
            }
            Ok(())
        })
    }

    /// Add a property to a record. An existing key is a duplicate name.
    pub fn add_record_property(
        &self,
        owner: UserId,
        id: EntityId,
        key: &str,
        value: &str,
    ) -> Result<()> {
        validate::require_id("document id", id)?;
        validate::require_name("property key", key)?;
        validate::require_description("property value", value)?;
        self.inner.with_user_mut(owner, |state| {
            let doc = state.typed_mut(id, DocumentKind::Record)?;
            if let DocumentBody::Record { properties, .. } = &mut doc.body {
                if properties.contains_key(key) {
                    return Err(Error::DuplicateName(format!("property '{}'", key)));
                }
                properties.insert(key.to_string(), value.to_string());
            }
            Ok(())
        })
    }

    /// Replace the value of an existing property.
    pub fn update_record_property(
        &self,
        owner: UserId,
        id: EntityId,
        key: &str,
        value: &str,
    ) -> Result<()> {
        validate::require_id("document id", id)?;
        validate::require_name("property key", key)?;
        validate::require_description("property value", value)?;
        self.inner.with_user_mut(owner, |state| {
            let doc = state.typed_mut(id, DocumentKind::Record)?;
            if let DocumentBody::Record { properties, .. } = &mut doc.body {
                match properties.get_mut(key) {
                    Some(slot) => *slot = value.to_string(),
                    None => {
                        return Err(Error::NotFound(format!(
                            "property '{}' of record {}",
                            key, id
                        )))
                    }
                }
            }
            Ok(())
        })
    }

    /// Remove an existing property.
    pub fn remove_record_property(&self, owner: UserId, id: EntityId, key: &str) -> Result<()> {
        validate::require_id("document id", id)?;
        validate::require_name("property key", key)?;
        self.inner.with_user_mut(owner, |state| {
            let doc = state.typed_mut(id, DocumentKind::Record)?;
            if let DocumentBody::Record { properties, .. } = &mut doc.body {
                if properties.remove(key).is_none() {
                    return Err(Error::NotFound(format!(
                        "property '{}' of record {}",
                        key, id
                    )));
                }
            }
            Ok(())
        })
    }

    /// Read one property value.
    pub fn record_property(&self, owner: UserId, id: EntityId, key: &str) -> Result<String> {
        validate::require_id("document id", id)?;
        validate::require_name("property key", key)?;
        self.inner.with_user(owner, |state| {
            let doc = state.typed(id, DocumentKind::Record)?;
            match &doc.body {
                DocumentBody::Record { properties, .. } => properties
                    .get(key)
                    .cloned()
                    .ok_or_else(|| Error::NotFound(format!("property '{}' of record {}", key, id))),
                _ => unreachable!("typed() guarantees a record body"),
            }
        })
    }
}
