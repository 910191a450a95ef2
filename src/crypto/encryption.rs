//! AES-256-GCM authenticated encryption with a caller-supplied nonce.
//!
//! Nonce generation and blob framing live in `CryptoEngine`; this layer
//! only seals and opens.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use super::keys::DerivedKey;
use crate::errors::{PassVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under `key` and `nonce`.
///
/// Returns `ciphertext || tag`.
pub fn encrypt(key: &DerivedKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(PassVaultError::EncryptionFailed(format!(
            "nonce must be {NONCE_LEN} bytes (got {})",
            nonce.len()
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| PassVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| PassVaultError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Decrypt `ciphertext || tag` and verify the tag.
///
/// Every failure maps to `AuthenticationFailed`.
pub fn decrypt(key: &DerivedKey, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(PassVaultError::AuthenticationFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| PassVaultError::AuthenticationFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| PassVaultError::AuthenticationFailed)
}
