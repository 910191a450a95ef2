//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - AES-256-GCM sealing and opening (`encryption`)
//! - A swappable backend trait over both (`provider`)
//! - `CryptoEngine`, which frames a password-encrypted blob as
//!   `base64(salt[16] || nonce[12] || ciphertext || tag[16])`

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod provider;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::errors::{PassVaultError, Result};

pub use encryption::{NONCE_LEN, TAG_LEN};
pub use kdf::{PBKDF2_ITERATIONS, SALT_LEN};
pub use keys::DerivedKey;
pub use provider::{CryptoProvider, SystemCrypto};

/// Password-based authenticated encryption of opaque payloads.
///
/// Knows nothing about vaults: it turns `(plaintext, password)` into a
/// text-safe blob and back.
#[derive(Debug, Clone, Default)]
pub struct CryptoEngine<P: CryptoProvider = SystemCrypto> {
    provider: P,
}

impl CryptoEngine<SystemCrypto> {
    /// An engine backed by the system primitives.
    pub fn new() -> Self {
        Self::with_provider(SystemCrypto)
    }
}

impl<P: CryptoProvider> CryptoEngine<P> {
    /// An engine backed by a custom provider.
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// Derive the symmetric key for `password` under a 16-byte `salt`.
    pub fn derive_key(&self, password: &str, salt: &[u8]) -> Result<DerivedKey> {
        self.provider.derive_key(password.as_bytes(), salt)
    }

    /// Encrypt `plaintext` under a key derived from `password`.
    ///
    /// A fresh salt and nonce are drawn for every call, so encrypting the
    /// same input twice never yields the same blob.
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<String> {
        ensure_password(password)?;

        let salt = self.provider.random_bytes(SALT_LEN)?;
        let nonce = self.provider.random_bytes(NONCE_LEN)?;
        let key = self.derive_key(password, &salt)?;

        let sealed = self.provider.aead_encrypt(&key, &nonce, plaintext)?;

        let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
        blob.extend_from_slice(&salt);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);

        Ok(BASE64.encode(blob))
    }

    /// Decrypt a blob produced by `encrypt`.
    ///
    /// A blob that is not base64 is a format problem; anything that decodes
    /// but fails to authenticate (wrong password, truncation, a flipped
    /// byte) is `AuthenticationFailed` and nothing more.
    pub fn decrypt(&self, blob: &str, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        ensure_password(password)?;

        let raw = BASE64.decode(blob.trim()).map_err(|e| {
            PassVaultError::InvalidVaultFormat(format!("encrypted payload is not base64: {e}"))
        })?;

        if raw.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return Err(PassVaultError::AuthenticationFailed);
        }

        let (salt, rest) = raw.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let key = self.derive_key(password, salt)?;
        let plaintext = self.provider.aead_decrypt(&key, nonce, ciphertext)?;

        Ok(Zeroizing::new(plaintext))
    }
}

/// SHA-256 digest of `data`, base64 encoded.
///
/// For non-secret comparisons only (e.g. spotting reused passwords);
/// never use it to store a password.
pub fn hash(data: &str) -> String {
    BASE64.encode(Sha256::digest(data.as_bytes()))
}

fn ensure_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(PassVaultError::Validation(
            "master password cannot be empty".into(),
        ));
    }
    Ok(())
}
