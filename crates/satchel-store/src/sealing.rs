//! AES-256-GCM implementation of the injected [`Cipher`] seam.
//!
//! Sealed format: 12-byte random nonce, then ciphertext with the 16-byte
//! authentication tag appended. The key is supplied by the host; the store
//! never persists it.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

use satchel_core::{Cipher, Error, Result};

const NONCE_LEN: usize = 12;

/// AES-256-GCM cipher over a host-supplied 32-byte key.
pub struct AesGcmCipher {
    key: [u8; 32],
}

impl AesGcmCipher {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }
}

impl Cipher for AesGcmCipher {
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| Error::Crypto(e.to_string()))?;
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| Error::Crypto("AES-GCM encryption failed".into()))?;
        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < NONCE_LEN {
            return Err(Error::Crypto("sealed value is truncated".into()));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| Error::Crypto(e.to_string()))?;
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Crypto("AES-GCM decryption failed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_round_trip() {
        let cipher = AesGcmCipher::new([7u8; 32]);
        let sealed = cipher.seal(b"hunter2").unwrap();
        assert_ne!(&sealed[NONCE_LEN..], b"hunter2".as_slice());
        assert_eq!(cipher.open(&sealed).unwrap(), b"hunter2");
    }

    #[test]
    fn test_open_rejects_wrong_key() {
        let sealed = AesGcmCipher::new([7u8; 32]).seal(b"secret").unwrap();
        let other = AesGcmCipher::new([8u8; 32]);
        assert!(matches!(other.open(&sealed), Err(Error::Crypto(_))));
    }

    #[test]
    fn test_open_rejects_truncated_input() {
        let cipher = AesGcmCipher::new([7u8; 32]);
        assert!(matches!(cipher.open(b"short"), Err(Error::Crypto(_))));
    }
}
