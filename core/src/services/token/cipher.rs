//! AES-256-GCM sealing of the identity payload

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};

use crate::errors::TokenError;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Encrypts and decrypts opaque payloads as base64url(nonce || ciphertext)
#[derive(Clone)]
pub struct PayloadCipher {
    cipher: Aes256Gcm,
}

impl PayloadCipher {
    /// Create a cipher from a 256-bit key
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        if key.len() != KEY_LEN {
            return Err(TokenError::Signing {
                reason: format!("encryption key must be {} bytes, got {}", KEY_LEN, key.len()),
            });
        }

        let key = Key::<Aes256Gcm>::from_slice(key);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Seal `plaintext` under a fresh random 96-bit nonce
    pub fn seal(&self, plaintext: &[u8]) -> Result<String, TokenError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| TokenError::Signing {
                reason: format!("payload encryption failed: {}", e),
            })?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Reverse of [`seal`](Self::seal); fails on bad encoding or tag mismatch
    pub fn open(&self, sealed: &str) -> Result<Vec<u8>, TokenError> {
        let raw = URL_SAFE_NO_PAD
            .decode(sealed)
            .map_err(|e| decryption(format!("invalid encoding: {}", e)))?;

        if raw.len() <= NONCE_LEN {
            return Err(decryption("payload too short"));
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| decryption("authentication failed"))
    }
}

impl std::fmt::Debug for PayloadCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadCipher").finish_non_exhaustive()
    }
}

fn decryption(reason: impl Into<String>) -> TokenError {
    TokenError::Decryption {
        reason: reason.into(),
    }
}
