//! Domain models for the satchel document store.
//!
//! These are plain serde-serializable records. The store crate persists them
//! verbatim inside each user's catalog file; callers receive them (or the
//! immutable `*Details` projections) from repository operations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier issued by the Identity Allocator. Unique across *every* entity
/// kind, so identifiers are comparable without a type tag. `0` is reserved
/// as "no id" and is never issued.
pub type EntityId = u64;

/// Identifier of an account. Drawn from the same allocator as every other
/// entity kind.
pub type UserId = u64;

/// The polymorphic variant set of the document registry.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentKind {
    /// A binary file with versioned content.
    File,
    /// A free-text note.
    Note,
    /// A stored URL.
    Url,
    /// A schema-free key/value record.
    Record,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::File => "File",
            DocumentKind::Note => "Note",
            DocumentKind::Url => "Url",
            DocumentKind::Record => "Record",
        }
    }
}

/// Variant-specific document payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum DocumentBody {
    File {
        name: String,
        narration: String,
        current_version: u32,
    },
    Note {
        text: String,
    },
    Url {
        url: String,
        description: String,
    },
    Record {
        name: String,
        properties: BTreeMap<String, String>,
    },
}

impl DocumentBody {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentBody::File { .. } => DocumentKind::File,
            DocumentBody::Note { .. } => DocumentKind::Note,
            DocumentBody::Url { .. } => DocumentKind::Url,
            DocumentBody::Record { .. } => DocumentKind::Record,
        }
    }
}

/// A document owned by exactly one user, destroyed only by explicit
/// deletion. The owner is implied by the catalog the document lives in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: EntityId,
    pub created_at: DateTime<Utc>,
    pub body: DocumentBody,
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        self.body.kind()
    }
}

/// Lowercased extension of a file name: the part after the last dot, or the
/// empty string when there is none (or the name ends in a dot).
pub fn file_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// A many-to-many tag applicable to any document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Aspect {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// An exclusive, single-parent filing folder. Every document is in exactly
/// one briefcase, defaulting to the per-user Global Briefcase.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Briefcase {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A many-to-many folder, structurally identical to an aspect but
/// semantically distinct.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A user-defined, named relation type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Predicate {
    pub id: EntityId,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// A subject-predicate-object triple between two documents. Self-relations
/// are permitted; multiple predicates may hold between the same ordered pair.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relation {
    pub subject: EntityId,
    pub object: EntityId,
    pub predicate: EntityId,
}

/// One entry in a file's version history. Version 0 is the content supplied
/// at creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileVersion {
    pub version: u32,
    pub content_hash: String,
    pub comment: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// A credential-vault record. The sealed secret is stored separately and
/// only surfaced through the credential repository.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Credential {
    pub id: EntityId,
    pub app_url: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A user account. The auth hash is a fixed-width hex digest supplied by the
/// host application.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: UserId,
    pub username: String,
    pub auth_hash: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// DETAIL PROJECTIONS
// =============================================================================
//
// Immutable records returned by GetDetails-style operations.

/// Details of a file document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileDetails {
    pub id: EntityId,
    pub name: String,
    pub narration: String,
    pub extension: String,
    pub current_version: u32,
    pub created_at: DateTime<Utc>,
}

/// Details of a note document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NoteDetails {
    pub id: EntityId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Details of a url document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UrlDetails {
    pub id: EntityId,
    pub url: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Details of a schema-free record document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecordDetails {
    pub id: EntityId,
    pub name: String,
    pub properties: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_as_str() {
        assert_eq!(DocumentKind::File.as_str(), "File");
        assert_eq!(DocumentKind::Record.as_str(), "Record");
    }

    #[test]
    fn test_body_kind() {
        let body = DocumentBody::Note {
            text: "hello".into(),
        };
        assert_eq!(body.kind(), DocumentKind::Note);
    }

    #[test]
    fn test_file_extension_lowercases() {
        assert_eq!(file_extension("report.PDF"), "pdf");
        assert_eq!(file_extension("archive.tar.GZ"), "gz");
    }

    #[test]
    fn test_file_extension_edge_cases() {
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension("trailing."), "");
        assert_eq!(file_extension(".hidden"), "");
    }
}
