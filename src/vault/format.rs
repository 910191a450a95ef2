//! JSON vault container format.
//!
//! A `.vault` file is a single pretty-printed JSON object:
//!
//! ```text
//! {
//!   "version": "1.0",
//!   "name": "Personal",
//!   "createdAt": "2026-01-05T09:12:44.120Z",
//!   "updatedAt": "2026-03-18T21:40:02.971Z",
//!   "data": "<base64(salt[16] || nonce[12] || ciphertext || tag[16])>"
//! }
//! ```
//!
//! - **version**: format tag. Only `"1.0"` is understood; anything else is
//!   rejected rather than decoded on a best-effort basis.
//! - **name**, **createdAt**, **updatedAt**: metadata, stored unencrypted.
//! - **data**: the encrypted credential list (a JSON array once decrypted).

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::credential::Credential;
use crate::errors::{PassVaultError, Result};

/// The only container version this build reads or writes.
pub const CURRENT_VERSION: &str = "1.0";

/// File extension used for vault files.
pub const FILE_EXTENSION: &str = "vault";

/// The persisted, at-rest representation of a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultContainer {
    pub version: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Base64 ciphertext blob produced by `CryptoEngine::encrypt`.
    #[serde(rename = "data")]
    pub payload: String,
}

/// Wire shape used while parsing, so that a missing `version` or `data`
/// can be reported as such instead of as a generic serde error.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContainer {
    version: Option<String>,
    #[serde(default)]
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    data: Option<String>,
}

impl VaultContainer {
    /// A new container at the current version with both timestamps set to `now`.
    pub fn new(name: &str, payload: String, now: DateTime<Utc>) -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            payload,
        }
    }

    /// Parse container bytes, rejecting malformed and unknown-version files.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: RawContainer = serde_json::from_slice(bytes)
            .map_err(|e| PassVaultError::InvalidVaultFormat(format!("container JSON: {e}")))?;

        let version = raw
            .version
            .ok_or_else(|| PassVaultError::InvalidVaultFormat("missing 'version' field".into()))?;
        if version != CURRENT_VERSION {
            return Err(PassVaultError::UnsupportedVersion(version));
        }

        let payload = raw
            .data
            .ok_or_else(|| PassVaultError::InvalidVaultFormat("missing 'data' field".into()))?;

        Ok(Self {
            version,
            name: raw.name,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            payload,
        })
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| PassVaultError::SerializationError(format!("container: {e}")))
    }

    /// The same container with a new payload, keeping `name` and `created_at`.
    ///
    /// `updated_at` strictly increases: if the clock has not moved past the
    /// previous value it is bumped by one millisecond.
    pub fn with_payload(&self, payload: String, now: DateTime<Utc>) -> Self {
        let floor = self.updated_at + Duration::milliseconds(1);
        Self {
            version: CURRENT_VERSION.to_string(),
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: now.max(floor),
            payload,
        }
    }
}

/// Serialize a credential list into the plaintext that gets encrypted.
pub fn encode_credentials(credentials: &[Credential]) -> Result<Zeroizing<Vec<u8>>> {
    serde_json::to_vec(credentials)
        .map(Zeroizing::new)
        .map_err(|e| PassVaultError::SerializationError(format!("credentials: {e}")))
}

/// Parse decrypted plaintext back into a credential list.
pub fn decode_credentials(plaintext: &[u8]) -> Result<Vec<Credential>> {
    // Serde messages may quote plaintext values, so none of them are
    // forwarded into the error.
    let credentials = serde_json::from_slice::<Vec<Credential>>(plaintext).map_err(|_| {
        if serde_json::from_slice::<Vec<IgnoredAny>>(plaintext).is_ok() {
            PassVaultError::InvalidVaultFormat("vault payload contains a malformed credential".into())
        } else {
            PassVaultError::InvalidVaultFormat("vault payload is not a credential list".into())
        }
    })?;
    check_records(&credentials)?;
    Ok(credentials)
}

/// Ids are unique and no record was updated before it was created.
fn check_records(credentials: &[Credential]) -> Result<()> {
    let mut seen = HashSet::with_capacity(credentials.len());
    for (index, credential) in credentials.iter().enumerate() {
        if !seen.insert(credential.id.as_str()) {
            return Err(PassVaultError::InvalidVaultFormat(format!(
                "vault payload repeats credential id {}",
                credential.id
            )));
        }
        if credential.updated_at < credential.created_at {
            return Err(PassVaultError::InvalidVaultFormat(format!(
                "credential {} (entry {}) was updated before it was created",
                credential.id,
                index + 1
            )));
        }
    }
    Ok(())
}
