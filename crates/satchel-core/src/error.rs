//! Error types for the satchel document store.

use thiserror::Error;

/// Result type alias using satchel's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for satchel operations.
///
/// Every repository operation validates argument shape first, so a zero
/// identifier is always reported as `IllegalArgument` and never as
/// `NotFound`.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input detectable without touching storage.
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// A syntactically valid identifier or name that does not resolve to a
    /// live entity.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint violation.
    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// A structurally valid request that violates a domain rule.
    #[error("Illegal operation: {0}")]
    IllegalOperation(String),

    /// Credential mismatch on session establishment.
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    /// Sealing or opening a credential secret failed.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Archive container error.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
