//! Content hashing.
//!
//! The digest exposed to callers is a fixed-width lowercase hex string
//! ([`crate::defaults::CONTENT_HASH_LEN`] characters). The hasher is an
//! injected service so tests can substitute a deterministic stub.

use sha2::{Digest, Sha256};

/// Produces the content digest used for version records and duplicate
/// detection.
pub trait ContentHasher: Send + Sync {
    /// Digest `data` as a fixed-width lowercase hex string.
    fn digest_hex(&self, data: &[u8]) -> String;
}

/// Default hasher: BLAKE3, rendered as 64 hex characters.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hasher;

impl ContentHasher for Blake3Hasher {
    fn digest_hex(&self, data: &[u8]) -> String {
        blake3::hash(data).to_hex().to_string()
    }
}

/// SHA-256 as lowercase hex. Hosts use this to produce authentication
/// hashes in the shape `validate::require_auth_hash` expects.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
