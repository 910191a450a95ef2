//! Capability interface over the platform cryptographic primitives.
//!
//! `CryptoEngine` only ever touches randomness, key derivation and the
//! AEAD cipher through this trait, so a different backend (or a
//! deterministic one in tests) can be swapped in without touching the
//! blob format.

use rand::rngs::OsRng;
use rand::TryRngCore;

use super::encryption;
use super::kdf;
use super::keys::DerivedKey;
use crate::errors::{PassVaultError, Result};

/// The primitives the vault core needs from a crypto backend.
pub trait CryptoProvider {
    /// Fill a fresh buffer of `len` bytes from a CSPRNG.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>>;

    /// Slow, salted, deterministic password-to-key derivation.
    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<DerivedKey>;

    /// Seal `plaintext`, returning `ciphertext || tag`.
    fn aead_encrypt(&self, key: &DerivedKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Open `ciphertext || tag`; any failure is `AuthenticationFailed`.
    fn aead_decrypt(&self, key: &DerivedKey, nonce: &[u8], ciphertext: &[u8])
        -> Result<Vec<u8>>;
}

/// Default backend: OS randomness, PBKDF2-HMAC-SHA256, AES-256-GCM.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCrypto;

impl CryptoProvider for SystemCrypto {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| PassVaultError::RandomnessFailed(e.to_string()))?;
        Ok(buf)
    }

    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
        kdf::derive_key(password, salt)
    }

    fn aead_encrypt(&self, key: &DerivedKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        encryption::encrypt(key, nonce, plaintext)
    }

    fn aead_decrypt(
        &self,
        key: &DerivedKey,
        nonce: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        encryption::decrypt(key, nonce, ciphertext)
    }
}
