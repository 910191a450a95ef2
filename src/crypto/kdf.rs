//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is fixed: format version 1.0 stores only the salt,
//! so every vault of that version must be opened with exactly the same
//! parameters it was written with.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{PassVaultError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// PBKDF2 iteration count used by format version 1.0.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte key from a password and a 16-byte salt.
///
/// The same password + salt always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
    if salt.len() != SALT_LEN {
        return Err(PassVaultError::Validation(format!(
            "salt must be exactly {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut key);

    let derived = DerivedKey::new(key);
    zeroize::Zeroize::zeroize(&mut key);
    Ok(derived)
}
