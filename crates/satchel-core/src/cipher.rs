//! Injected cipher seam for credential secrets.
//!
//! The store never chooses an encryption-at-rest algorithm; it seals and
//! opens byte strings through this trait. The shipped AES-256-GCM
//! implementation lives in the store crate.

use crate::error::Result;

/// Seals and opens credential secrets.
pub trait Cipher: Send + Sync {
    /// Encrypt `plaintext` into a self-contained sealed form.
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt a value produced by [`Cipher::seal`].
    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>>;
}

/// Identity cipher for tests and hosts that store secrets elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCipher;

impl Cipher for NullCipher {
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Ok(plaintext.to_vec())
    }

    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        Ok(sealed.to_vec())
    }
}
