//! Version & Hash Engine.
//!
//! Per-file version history plus the deterministic content digest and the
//! heuristic cross-file duplicate score. Version numbers are monotonic per
//! file, starting at 0 for the content supplied at creation; version blobs
//! live under the owner's tenant root and are removed with the file.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use satchel_core::{
    duplicate_score, validate, DocumentBody, DocumentKind, EntityId, Error, FileVersion, Result,
    UserId,
};

use crate::fsio;
use crate::state::UserState;
use crate::StoreInner;

/// Repository for file version history and duplicate detection.
pub struct VersionRepository {
    inner: Arc<StoreInner>,
}

impl VersionRepository {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    /// Store `content` as the file's next version and return its number.
    pub fn save_as_next_version(
        &self,
        owner: UserId,
        file: EntityId,
        content: &[u8],
        comment: &str,
    ) -> Result<u32> {
        validate::require_id("document id", file)?;
        validate::require_description("version comment", comment)?;
        let hash = self.inner.hasher.digest_hex(content);
        let now = self.inner.now();
        let inner = Arc::clone(&self.inner);
        let size = content.len() as u64;
        self.inner.with_user_mut(owner, move |state| {
            let doc = state.typed_mut(file, DocumentKind::File)?;
            let next = match &mut doc.body {
                DocumentBody::File { current_version, .. } => {
                    let next = *current_version + 1;
                    *current_version = next;
                    next
                }
                _ => unreachable!("typed_mut() guarantees a file body"),
            };
            fsio::write_atomic(&inner.blob_path(owner, file, next), content)?;
            state.versions.entry(file).or_default().push(FileVersion {
                version: next,
                content_hash: hash,
                comment: comment.to_string(),
                size_bytes: size,
                created_at: now,
            });
            debug!(owner, file, version = next, "versions: saved");
            Ok(next)
        })
    }

    /// The file's full version history, ascending by version number.
    pub fn versions(&self, owner: UserId, file: EntityId) -> Result<Vec<FileVersion>> {
        validate::require_id("document id", file)?;
        self.inner.with_user(owner, |state| {
            state.typed(file, DocumentKind::File)?;
            let mut history = state.versions.get(&file).cloned().unwrap_or_default();
            history.sort_by_key(|v| v.version);
            Ok(history)
        })
    }

    /// The file's highest version number.
    pub fn current(&self, owner: UserId, file: EntityId) -> Result<u32> {
        validate::require_id("document id", file)?;
        self.inner.with_user(owner, |state| {
            let doc = state.typed(file, DocumentKind::File)?;
            match &doc.body {
                DocumentBody::File { current_version, .. } => Ok(*current_version),
                _ => unreachable!("typed() guarantees a file body"),
            }
        })
    }

    /// Bytes of one version of a file.
    pub fn content(&self, owner: UserId, file: EntityId, version: u32) -> Result<Vec<u8>> {
        validate::require_id("document id", file)?;
        self.inner.with_user(owner, |state| {
            state.typed(file, DocumentKind::File)?;
            let known = state
                .versions
                .get(&file)
                .map(|history| history.iter().any(|v| v.version == version))
                .unwrap_or(false);
            if !known {
                return Err(Error::NotFound(format!(
                    "version {} of file {}",
                    version, file
                )));
            }
            fsio::read_optional(&self.inner.blob_path(owner, file, version))?.ok_or_else(|| {
                Error::NotFound(format!("content of version {} of file {}", version, file))
            })
        })
    }

    /// Bytes of the file's current version.
    pub fn current_content(&self, owner: UserId, file: EntityId) -> Result<Vec<u8>> {
        let version = self.current(owner, file)?;
        self.content(owner, file, version)
    }

    /// Digest `content` with the store's hasher.
    pub fn content_hash(&self, content: &[u8]) -> String {
        self.inner.hasher.digest_hex(content)
    }

    /// Score every other file of the same owner whose current content hash
    /// matches the target's exactly. Files with different content never
    /// appear, regardless of name or narration; the target never scores
    /// against itself.
    pub fn duplicates_of(&self, owner: UserId, file: EntityId) -> Result<BTreeMap<EntityId, f64>> {
        validate::require_id("document id", file)?;
        self.inner.with_user(owner, |state| {
            let (target_name, target_narration) = match &state.typed(file, DocumentKind::File)?.body
            {
                DocumentBody::File { name, narration, .. } => (name.clone(), narration.clone()),
                _ => unreachable!("typed() guarantees a file body"),
            };
            let target_hash = current_hash(state, file)?;

            let mut scores = BTreeMap::new();
            for doc in state.documents.values() {
                if doc.id == file {
                    continue;
                }
                let (name, narration) = match &doc.body {
                    DocumentBody::File { name, narration, .. } => (name, narration),
                    _ => continue,
                };
                let hash = match current_hash(state, doc.id) {
                    Ok(hash) => hash,
                    Err(_) => continue,
                };
                if hash != target_hash {
                    continue;
                }
                scores.insert(
                    doc.id,
                    duplicate_score(*name == target_name, *narration == target_narration),
                );
            }
            Ok(scores)
        })
    }
}

/// Content hash of a file's current version.
fn current_hash(state: &UserState, file: EntityId) -> Result<String> {
    let current = match &state.document(file)?.body {
        DocumentBody::File { current_version, .. } => *current_version,
        _ => return Err(Error::NotFound(format!("file {}", file))),
    };
    state
        .versions
        .get(&file)
        .and_then(|history| history.iter().find(|v| v.version == current))
        .map(|v| v.content_hash.clone())
        .ok_or_else(|| Error::NotFound(format!("version {} of file {}", current, file)))
}
