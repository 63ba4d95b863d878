//! Per-user in-memory index and its on-disk catalog form.
//!
//! Every user owns one `catalog.json` inside their tenant root. On disk the
//! catalog is flat rows (entity lists plus edge pairs/triples) and the
//! in-memory [`UserState`] rebuilds the cross-reference maps on load.
//! Mutating operations run on a copy of the state; the copy replaces the
//! live index only after the catalog write lands, so a failed call leaves
//! both memory and disk exactly as they were.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use satchel_core::{
    Account, Aspect, Briefcase, Collection, Credential, Document, DocumentKind, EntityId, Error,
    FileVersion, IdSet, Predicate, Relation, Result,
};

use crate::fsio;

/// Catalog file name inside each user root.
pub(crate) const CATALOG_FILE: &str = "catalog.json";

/// Lowercase entity label used in error messages.
pub(crate) fn kind_label(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::File => "file",
        DocumentKind::Note => "note",
        DocumentKind::Url => "url",
        DocumentKind::Record => "record",
    }
}

/// A credential row with its sealed secret (base64 of the cipher output).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct CredentialRow {
    pub id: EntityId,
    pub app_url: String,
    pub username: String,
    pub sealed_secret: String,
    pub created_at: DateTime<Utc>,
}

impl CredentialRow {
    pub fn to_credential(&self) -> Credential {
        Credential {
            id: self.id,
            app_url: self.app_url.clone(),
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

/// The in-memory index of one user's entities and edges.
#[derive(Clone, Debug)]
pub(crate) struct UserState {
    pub account: Account,
    pub documents: HashMap<EntityId, Document>,

    pub aspects: HashMap<EntityId, Aspect>,
    /// aspect -> documents it is applied to. An entry exists for every live
    /// aspect.
    pub aspect_docs: HashMap<EntityId, IdSet>,
    /// document -> aspects applied to it. Entries may be absent.
    pub doc_aspects: HashMap<EntityId, IdSet>,

    pub briefcases: HashMap<EntityId, Briefcase>,
    pub global_briefcase: EntityId,
    /// document -> containing briefcase. Defined for every live document.
    pub filing: HashMap<EntityId, EntityId>,
    /// briefcase -> contained documents. An entry exists for every live
    /// briefcase.
    pub briefcase_docs: HashMap<EntityId, IdSet>,

    pub collections: HashMap<EntityId, Collection>,
    pub collection_docs: HashMap<EntityId, IdSet>,
    pub doc_collections: HashMap<EntityId, IdSet>,

    pub predicates: HashMap<EntityId, Predicate>,
    /// (subject, object) -> predicates holding between the ordered pair.
    pub relations: HashMap<(EntityId, EntityId), IdSet>,

    pub versions: HashMap<EntityId, Vec<FileVersion>>,
    pub bookmarks: IdSet,
    pub credentials: HashMap<EntityId, CredentialRow>,
}

impl UserState {
    /// Fresh state for a new account with its implicit Global Briefcase.
    pub fn new(account: Account, global: Briefcase) -> Self {
        let global_id = global.id;
        let mut briefcases = HashMap::new();
        briefcases.insert(global_id, global);
        let mut briefcase_docs = HashMap::new();
        briefcase_docs.insert(global_id, IdSet::new());
        Self {
            account,
            documents: HashMap::new(),
            aspects: HashMap::new(),
            aspect_docs: HashMap::new(),
            doc_aspects: HashMap::new(),
            briefcases,
            global_briefcase: global_id,
            filing: HashMap::new(),
            briefcase_docs,
            collections: HashMap::new(),
            collection_docs: HashMap::new(),
            doc_collections: HashMap::new(),
            predicates: HashMap::new(),
            relations: HashMap::new(),
            versions: HashMap::new(),
            bookmarks: IdSet::new(),
            credentials: HashMap::new(),
        }
    }

    // ─── Lookup helpers ────────────────────────────────────────────────────

    pub fn document(&self, id: EntityId) -> Result<&Document> {
        self.documents
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("document {}", id)))
    }

    pub fn document_mut(&mut self, id: EntityId) -> Result<&mut Document> {
        self.documents
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("document {}", id)))
    }

    /// A document of a specific variant; a live document of another variant
    /// is reported as a missing entity of the requested kind.
    pub fn typed(&self, id: EntityId, kind: DocumentKind) -> Result<&Document> {
        let doc = self.document(id)?;
        if doc.kind() != kind {
            return Err(Error::NotFound(format!("{} {}", kind_label(kind), id)));
        }
        Ok(doc)
    }

    pub fn typed_mut(&mut self, id: EntityId, kind: DocumentKind) -> Result<&mut Document> {
        let doc = self.document_mut(id)?;
        if doc.kind() != kind {
            return Err(Error::NotFound(format!("{} {}", kind_label(kind), id)));
        }
        Ok(doc)
    }

    pub fn aspect(&self, id: EntityId) -> Result<&Aspect> {
        self.aspects
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("aspect {}", id)))
    }

    pub fn aspect_mut(&mut self, id: EntityId) -> Result<&mut Aspect> {
        self.aspects
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("aspect {}", id)))
    }

    pub fn briefcase(&self, id: EntityId) -> Result<&Briefcase> {
        self.briefcases
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("briefcase {}", id)))
    }

    pub fn briefcase_mut(&mut self, id: EntityId) -> Result<&mut Briefcase> {
        self.briefcases
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("briefcase {}", id)))
    }

    pub fn collection(&self, id: EntityId) -> Result<&Collection> {
        self.collections
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("collection {}", id)))
    }

    pub fn collection_mut(&mut self, id: EntityId) -> Result<&mut Collection> {
        self.collections
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("collection {}", id)))
    }

    pub fn predicate(&self, id: EntityId) -> Result<&Predicate> {
        self.predicates
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("predicate {}", id)))
    }

    pub fn predicate_mut(&mut self, id: EntityId) -> Result<&mut Predicate> {
        self.predicates
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("predicate {}", id)))
    }

    pub fn credential(&self, id: EntityId) -> Result<&CredentialRow> {
        self.credentials
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("credential {}", id)))
    }

    // ─── Edge maintenance ──────────────────────────────────────────────────

    pub fn apply_aspect_edge(&mut self, aspect: EntityId, doc: EntityId) {
        self.aspect_docs.entry(aspect).or_default().insert(doc);
        self.doc_aspects.entry(doc).or_default().insert(aspect);
    }

    pub fn drop_aspect_edge(&mut self, aspect: EntityId, doc: EntityId) {
        if let Some(set) = self.aspect_docs.get_mut(&aspect) {
            set.remove(&doc);
        }
        if let Some(set) = self.doc_aspects.get_mut(&doc) {
            set.remove(&aspect);
        }
    }

    pub fn add_collection_edge(&mut self, collection: EntityId, doc: EntityId) {
        self.collection_docs.entry(collection).or_default().insert(doc);
        self.doc_collections.entry(doc).or_default().insert(collection);
    }

    pub fn drop_collection_edge(&mut self, collection: EntityId, doc: EntityId) {
        if let Some(set) = self.collection_docs.get_mut(&collection) {
            set.remove(&doc);
        }
        if let Some(set) = self.doc_collections.get_mut(&doc) {
            set.remove(&collection);
        }
    }

    /// Move a document into a briefcase, unfiling it from its previous one.
    pub fn file_into(&mut self, doc: EntityId, briefcase: EntityId) {
        if let Some(prev) = self.filing.insert(doc, briefcase) {
            if let Some(set) = self.briefcase_docs.get_mut(&prev) {
                set.remove(&doc);
            }
        }
        self.briefcase_docs.entry(briefcase).or_default().insert(doc);
    }

    // ─── Name uniqueness scans ─────────────────────────────────────────────

    pub fn aspect_name_taken(&self, name: &str) -> bool {
        self.aspects.values().any(|a| a.name == name)
    }

    pub fn briefcase_name_taken(&self, name: &str) -> bool {
        self.briefcases.values().any(|b| b.name == name)
    }

    pub fn collection_name_taken(&self, name: &str) -> bool {
        self.collections.values().any(|c| c.name == name)
    }

    pub fn predicate_label_taken(&self, label: &str) -> bool {
        self.predicates.values().any(|p| p.label == label)
    }

    pub fn record_name_taken(&self, name: &str) -> bool {
        self.documents.values().any(|d| {
            matches!(&d.body, satchel_core::DocumentBody::Record { name: n, .. } if n == name)
        })
    }

    pub fn credential_pair_taken(&self, app_url: &str, username: &str) -> bool {
        self.credentials
            .values()
            .any(|c| c.app_url == app_url && c.username == username)
    }

    // ─── Persistence ───────────────────────────────────────────────────────

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fsio::read_optional(path)?
            .ok_or_else(|| Error::NotFound(format!("catalog at {}", path.display())))?;
        let catalog: CatalogFile = serde_json::from_slice(&bytes)?;
        Ok(catalog.into_state())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let catalog = CatalogFile::from_state(self);
        let bytes = serde_json::to_vec_pretty(&catalog)?;
        fsio::write_atomic(path, &bytes)
    }
}

/// On-disk form of a user catalog: entity rows plus flat edge lists. Maps
/// keyed by tuples do not survive JSON, so edges are stored as pairs and the
/// indices are rebuilt on load.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    account: Account,
    documents: Vec<Document>,
    aspects: Vec<Aspect>,
    /// (aspect, document) applied edges.
    applied: Vec<(EntityId, EntityId)>,
    briefcases: Vec<Briefcase>,
    global_briefcase: EntityId,
    /// (document, briefcase) filing edges.
    filing: Vec<(EntityId, EntityId)>,
    collections: Vec<Collection>,
    /// (collection, document) membership edges.
    collected: Vec<(EntityId, EntityId)>,
    predicates: Vec<Predicate>,
    relations: Vec<Relation>,
    /// (file, version history) rows.
    versions: Vec<(EntityId, Vec<FileVersion>)>,
    bookmarks: Vec<EntityId>,
    credentials: Vec<CredentialRow>,
}

impl CatalogFile {
    fn from_state(state: &UserState) -> Self {
        let mut documents: Vec<_> = state.documents.values().cloned().collect();
        documents.sort_by_key(|d| d.id);
        let mut aspects: Vec<_> = state.aspects.values().cloned().collect();
        aspects.sort_by_key(|a| a.id);
        let mut briefcases: Vec<_> = state.briefcases.values().cloned().collect();
        briefcases.sort_by_key(|b| b.id);
        let mut collections: Vec<_> = state.collections.values().cloned().collect();
        collections.sort_by_key(|c| c.id);
        let mut predicates: Vec<_> = state.predicates.values().cloned().collect();
        predicates.sort_by_key(|p| p.id);
        let mut credentials: Vec<_> = state.credentials.values().cloned().collect();
        credentials.sort_by_key(|c| c.id);

        let mut applied = Vec::new();
        for (aspect, docs) in &state.aspect_docs {
            for doc in docs {
                applied.push((*aspect, *doc));
            }
        }
        applied.sort_unstable();

        let mut filing: Vec<_> = state.filing.iter().map(|(d, b)| (*d, *b)).collect();
        filing.sort_unstable();

        let mut collected = Vec::new();
        for (collection, docs) in &state.collection_docs {
            for doc in docs {
                collected.push((*collection, *doc));
            }
        }
        collected.sort_unstable();

        let mut relations = Vec::new();
        for ((subject, object), preds) in &state.relations {
            for predicate in preds {
                relations.push(Relation {
                    subject: *subject,
                    object: *object,
                    predicate: *predicate,
                });
            }
        }
        relations.sort_by_key(|r| (r.subject, r.object, r.predicate));

        let mut versions: Vec<_> = state
            .versions
            .iter()
            .map(|(file, history)| (*file, history.clone()))
            .collect();
        versions.sort_by_key(|(file, _)| *file);

        Self {
            account: state.account.clone(),
            documents,
            aspects,
            applied,
            briefcases,
            global_briefcase: state.global_briefcase,
            filing,
            collections,
            collected,
            predicates,
            relations,
            versions,
            bookmarks: state.bookmarks.iter().copied().collect(),
            credentials,
        }
    }

    fn into_state(self) -> UserState {
        let mut state = UserState {
            account: self.account,
            documents: self.documents.into_iter().map(|d| (d.id, d)).collect(),
            aspects: self.aspects.into_iter().map(|a| (a.id, a)).collect(),
            aspect_docs: HashMap::new(),
            doc_aspects: HashMap::new(),
            briefcases: self.briefcases.into_iter().map(|b| (b.id, b)).collect(),
            global_briefcase: self.global_briefcase,
            filing: self.filing.into_iter().collect(),
            briefcase_docs: HashMap::new(),
            collections: self.collections.into_iter().map(|c| (c.id, c)).collect(),
            collection_docs: HashMap::new(),
            doc_collections: HashMap::new(),
            predicates: self.predicates.into_iter().map(|p| (p.id, p)).collect(),
            relations: HashMap::new(),
            versions: self.versions.into_iter().collect(),
            bookmarks: self.bookmarks.into_iter().collect(),
            credentials: self.credentials.into_iter().map(|c| (c.id, c)).collect(),
        };

        // Every live grouping entity keeps an index entry, even when empty.
        for aspect in state.aspects.keys() {
            state.aspect_docs.insert(*aspect, IdSet::new());
        }
        for briefcase in state.briefcases.keys() {
            state.briefcase_docs.insert(*briefcase, IdSet::new());
        }
        for collection in state.collections.keys() {
            state.collection_docs.insert(*collection, IdSet::new());
        }

        for (aspect, doc) in self.applied {
            state.aspect_docs.entry(aspect).or_default().insert(doc);
            state.doc_aspects.entry(doc).or_default().insert(aspect);
        }
        for (doc, briefcase) in &state.filing {
            state
                .briefcase_docs
                .entry(*briefcase)
                .or_default()
                .insert(*doc);
        }
        for (collection, doc) in self.collected {
            state
                .collection_docs
                .entry(collection)
                .or_default()
                .insert(doc);
            state
                .doc_collections
                .entry(doc)
                .or_default()
                .insert(collection);
        }
        for relation in self.relations {
            state
                .relations
                .entry((relation.subject, relation.object))
                .or_default()
                .insert(relation.predicate);
        }

        state
    }
}
