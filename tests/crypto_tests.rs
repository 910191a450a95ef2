//! Integration tests for the PassVault crypto module.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

use passvault::crypto::{
    hash, CryptoEngine, CryptoProvider, DerivedKey, SystemCrypto, NONCE_LEN, SALT_LEN, TAG_LEN,
};
use passvault::errors::{ErrorKind, PassVaultError, Result};

/// Provider whose "randomness" is a fixed byte, so blobs are reproducible.
#[derive(Debug, Clone, Copy, Default)]
struct FixedRandom;

impl CryptoProvider for FixedRandom {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        Ok(vec![0x42; len])
    }

    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
        SystemCrypto.derive_key(password, salt)
    }

    fn aead_encrypt(&self, key: &DerivedKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        SystemCrypto.aead_encrypt(key, nonce, plaintext)
    }

    fn aead_decrypt(&self, key: &DerivedKey, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        SystemCrypto.aead_decrypt(key, nonce, ciphertext)
    }
}

/// Provider whose randomness source is broken.
struct NoEntropy;

impl CryptoProvider for NoEntropy {
    fn random_bytes(&self, _len: usize) -> Result<Vec<u8>> {
        Err(PassVaultError::RandomnessFailed("no entropy".into()))
    }

    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
        SystemCrypto.derive_key(password, salt)
    }

    fn aead_encrypt(&self, key: &DerivedKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        SystemCrypto.aead_encrypt(key, nonce, plaintext)
    }

    fn aead_decrypt(&self, key: &DerivedKey, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        SystemCrypto.aead_decrypt(key, nonce, ciphertext)
    }
}

/// System randomness and AEAD with a single-round key derivation, for
/// tests that decrypt many times.
struct FastKdf;

impl CryptoProvider for FastKdf {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        SystemCrypto.random_bytes(len)
    }

    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
        let digest = Sha256::new().chain_update(salt).chain_update(password).finalize();
        Ok(DerivedKey::new(digest.into()))
    }

    fn aead_encrypt(&self, key: &DerivedKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        SystemCrypto.aead_encrypt(key, nonce, plaintext)
    }

    fn aead_decrypt(&self, key: &DerivedKey, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        SystemCrypto.aead_decrypt(key, nonce, ciphertext)
    }
}

// ---------------------------------------------------------------------------
// Round-trip and blob layout
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let engine = CryptoEngine::new();
    let plaintext = br#"[{"name":"Mail"}]"#;

    let blob = engine.encrypt(plaintext, "correcthorse1").expect("encrypt");
    let recovered = engine.decrypt(&blob, "correcthorse1").expect("decrypt");

    assert_eq!(recovered.as_slice(), plaintext);
}

#[test]
fn blob_layout_is_salt_nonce_ciphertext_tag() {
    let engine = CryptoEngine::new();
    let plaintext = b"hello vault";

    let blob = engine.encrypt(plaintext, "pw-123456").unwrap();
    let raw = BASE64.decode(&blob).expect("standard base64");

    assert_eq!(raw.len(), SALT_LEN + NONCE_LEN + plaintext.len() + TAG_LEN);
}

#[test]
fn empty_plaintext_roundtrips() {
    let engine = CryptoEngine::new();
    let blob = engine.encrypt(b"", "pw-123456").unwrap();
    assert_eq!(BASE64.decode(&blob).unwrap().len(), SALT_LEN + NONCE_LEN + TAG_LEN);
    assert!(engine.decrypt(&blob, "pw-123456").unwrap().is_empty());
}

#[test]
fn encrypt_produces_different_blobs_each_time() {
    let engine = CryptoEngine::new();
    let a = engine.encrypt(b"same", "pw-123456").unwrap();
    let b = engine.encrypt(b"same", "pw-123456").unwrap();
    assert_ne!(a, b, "fresh salt and nonce must make blobs differ");
}

#[test]
fn fixed_randomness_gives_identical_blobs() {
    let engine = CryptoEngine::with_provider(FixedRandom);
    let a = engine.encrypt(b"same", "pw-123456").unwrap();
    let b = engine.encrypt(b"same", "pw-123456").unwrap();
    assert_eq!(a, b);

    let raw = BASE64.decode(&a).unwrap();
    assert!(raw[..SALT_LEN + NONCE_LEN].iter().all(|&b| b == 0x42));

    // And the system engine can read it.
    let recovered = CryptoEngine::new().decrypt(&a, "pw-123456").unwrap();
    assert_eq!(recovered.as_slice(), b"same");
}

#[test]
fn randomness_failure_is_reported() {
    let engine = CryptoEngine::with_provider(NoEntropy);
    let err = engine.encrypt(b"data", "pw-123456").unwrap_err();
    assert!(matches!(err, PassVaultError::RandomnessFailed(_)));
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_key_is_deterministic() {
    let engine = CryptoEngine::new();
    let salt = [9u8; SALT_LEN];
    let k1 = engine.derive_key("pw-123456", &salt).unwrap();
    let k2 = engine.derive_key("pw-123456", &salt).unwrap();
    assert_eq!(k1, k2);
}

#[test]
fn derive_key_depends_on_salt_and_password() {
    let engine = CryptoEngine::new();
    let base = engine.derive_key("pw-123456", &[1u8; SALT_LEN]).unwrap();
    let other_salt = engine.derive_key("pw-123456", &[2u8; SALT_LEN]).unwrap();
    let other_pw = engine.derive_key("pw-654321", &[1u8; SALT_LEN]).unwrap();
    assert_ne!(base, other_salt);
    assert_ne!(base, other_pw);
}

#[test]
fn derive_key_rejects_wrong_salt_length() {
    let engine = CryptoEngine::new();
    let err = engine.derive_key("pw-123456", &[0u8; 8]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

// ---------------------------------------------------------------------------
// Authentication failures
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_fails_authentication() {
    let engine = CryptoEngine::new();
    let blob = engine.encrypt(b"secret", "correcthorse1").unwrap();
    let err = engine.decrypt(&blob, "wrongpass123").unwrap_err();
    assert!(matches!(err, PassVaultError::AuthenticationFailed));
    assert!(err.kind().is_retryable());
}

#[test]
fn flipping_any_single_byte_fails_authentication() {
    let engine = CryptoEngine::with_provider(FastKdf);
    let blob = engine.encrypt(b"tamper with me", "pw-123456").unwrap();
    let raw = BASE64.decode(&blob).unwrap();

    // Every byte of salt, nonce, ciphertext and tag.
    for pos in 0..raw.len() {
        for bit in [0x01, 0x80] {
            let mut tampered = raw.clone();
            tampered[pos] ^= bit;
            let err = engine
                .decrypt(&BASE64.encode(&tampered), "pw-123456")
                .unwrap_err();
            assert!(
                matches!(err, PassVaultError::AuthenticationFailed),
                "byte {pos} (mask {bit:#04x}) should break authentication"
            );
        }
    }
    assert!(engine.decrypt(&blob, "pw-123456").is_ok());
}

#[test]
fn flipping_the_pbkdf2_salt_fails_authentication() {
    let engine = CryptoEngine::with_provider(FixedRandom);
    let blob = engine.encrypt(b"tamper with me", "pw-123456").unwrap();
    let mut raw = BASE64.decode(&blob).unwrap();
    raw[0] ^= 0x01;

    let err = engine.decrypt(&BASE64.encode(&raw), "pw-123456").unwrap_err();
    assert!(matches!(err, PassVaultError::AuthenticationFailed));
}

#[test]
fn truncated_blob_fails_authentication() {
    let engine = CryptoEngine::new();
    let short = BASE64.encode([0u8; SALT_LEN + NONCE_LEN + TAG_LEN - 1]);
    let err = engine.decrypt(&short, "pw-123456").unwrap_err();
    assert!(matches!(err, PassVaultError::AuthenticationFailed));
}

#[test]
fn non_base64_blob_is_a_format_error() {
    let engine = CryptoEngine::new();
    let err = engine.decrypt("not base64 !!!", "pw-123456").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn empty_password_is_rejected() {
    let engine = CryptoEngine::new();
    assert_eq!(
        engine.encrypt(b"x", "").unwrap_err().kind(),
        ErrorKind::Validation
    );
    assert_eq!(
        engine.decrypt("AAAA", "").unwrap_err().kind(),
        ErrorKind::Validation
    );
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

#[test]
fn hash_is_base64_sha256() {
    assert_eq!(hash("abc"), "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0=");
    assert_eq!(hash("abc"), hash("abc"));
    assert_ne!(hash("abc"), hash("abd"));
}
