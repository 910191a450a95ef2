//! Plaintext JSON export and import of credentials.
//!
//! An export file is unencrypted by nature; callers are expected to warn
//! the user before writing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::credential::{Credential, CredentialDraft};
use super::format::CURRENT_VERSION;
use super::resource::VaultResource;
use super::session::Session;
use crate::crypto::CryptoProvider;
use crate::errors::{PassVaultError, Result};

/// The document written by `export`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData<'a> {
    pub exported_at: DateTime<Utc>,
    pub version: &'static str,
    pub vault_name: &'a str,
    pub credentials_count: usize,
    pub credentials: &'a [Credential],
}

impl<'a> ExportData<'a> {
    pub fn new(vault_name: &'a str, credentials: &'a [Credential], now: DateTime<Utc>) -> Self {
        Self {
            exported_at: now,
            version: CURRENT_VERSION,
            vault_name,
            credentials_count: credentials.len(),
            credentials,
        }
    }

    pub fn to_json(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec_pretty(self)
            .map(Zeroizing::new)
            .map_err(|e| PassVaultError::SerializationError(format!("export: {e}")))
    }
}

/// One record of an import file. Everything is optional here; what is
/// actually required is checked per record so one bad entry does not sink
/// the whole import.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
struct ImportRecord {
    id: Option<String>,
    name: Option<String>,
    username: Option<String>,
    password: Option<String>,
    url: Option<String>,
    notes: Option<String>,
    category: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

/// Either a full export document or a bare credential array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Export { credentials: Vec<ImportRecord> },
    Bare(Vec<ImportRecord>),
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    /// Records whose id already exists in the vault.
    pub skipped: usize,
    /// One message per rejected record.
    pub errors: Vec<String>,
    pub imported_ids: Vec<String>,
}

impl ImportResult {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse `bytes` and add every valid, new record to `session`.
///
/// The session is only modified in memory; the caller saves.
pub fn import_into<R: VaultResource, P: CryptoProvider>(
    session: &mut Session<R, P>,
    bytes: &[u8],
) -> Result<ImportResult> {
    let file: ImportFile = serde_json::from_slice(bytes).map_err(|_| {
        PassVaultError::SerializationError(
            "import file must be a passvault export or a JSON array of credentials".into(),
        )
    })?;
    let records = match file {
        ImportFile::Export { credentials } => credentials,
        ImportFile::Bare(records) => records,
    };

    let now = Utc::now();
    let mut result = ImportResult::default();

    for (index, record) in records.iter().enumerate() {
        let credential = match to_credential(record, now) {
            Ok(c) => c,
            Err(e) => {
                result.errors.push(format!("entry {}: {e}", index + 1));
                continue;
            }
        };

        let exists = session.credentials()?.iter().any(|c| c.id == credential.id);
        if exists {
            result.skipped += 1;
            continue;
        }

        result.imported_ids.push(credential.id.clone());
        session.insert(credential)?;
        result.imported += 1;
    }

    Ok(result)
}

fn to_credential(record: &ImportRecord, now: DateTime<Utc>) -> Result<Credential> {
    let field = |value: &Option<String>| value.as_deref().unwrap_or_default().to_string();
    let draft = CredentialDraft {
        name: field(&record.name),
        username: field(&record.username),
        password: field(&record.password),
        url: field(&record.url),
        notes: field(&record.notes),
        category: field(&record.category),
    };

    let mut credential = Credential::new(&draft, now)?;
    if let Some(id) = record.id.as_deref().filter(|id| !id.trim().is_empty()) {
        credential.id = id.to_string();
    } else {
        credential.id = Uuid::new_v4().to_string();
    }

    let created_at = parse_timestamp("createdAt", record.created_at.as_deref())?.unwrap_or(now);
    let updated_at = parse_timestamp("updatedAt", record.updated_at.as_deref())?;
    credential.created_at = created_at;
    credential.updated_at = updated_at.unwrap_or(created_at).max(created_at);
    Ok(credential)
}

fn parse_timestamp(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|raw| {
            raw.parse::<DateTime<Utc>>().map_err(|_| {
                PassVaultError::Validation(format!("{field} is not an RFC 3339 timestamp"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_document_shape() {
        let json = ExportData::new("Personal", &[], Utc::now()).to_json().unwrap();
        let text = String::from_utf8(json.to_vec()).unwrap();
        assert!(text.contains("\"exportedAt\""));
        assert!(text.contains("\"vaultName\": \"Personal\""));
        assert!(text.contains("\"credentialsCount\": 0"));
    }

    #[test]
    fn record_without_id_gets_one() {
        let record: ImportRecord = serde_json::from_str(
            r#"{"name":"Mail","username":"me","password":"pw","category":"Email"}"#,
        )
        .unwrap();
        let c = to_credential(&record, Utc::now()).unwrap();
        assert!(!c.id.is_empty());
        assert_eq!(c.created_at, c.updated_at);
    }

    #[test]
    fn record_keeps_given_id_and_timestamps() {
        let record: ImportRecord = serde_json::from_str(
            r#"{"id":"abc","name":"Mail","username":"me","password":"pw","category":"Email",
                "createdAt":"2025-01-01T00:00:00Z","updatedAt":"2025-02-01T00:00:00Z"}"#,
        )
        .unwrap();
        let c = to_credential(&record, Utc::now()).unwrap();
        assert_eq!(c.id, "abc");
        assert!(c.updated_at > c.created_at);
    }

    #[test]
    fn record_with_bad_timestamp_is_rejected() {
        let record: ImportRecord = serde_json::from_str(
            r#"{"name":"Mail","username":"me","password":"pw","category":"Email","createdAt":"last tuesday"}"#,
        )
        .unwrap();
        let err = to_credential(&record, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("createdAt"));
    }

    #[test]
    fn record_missing_password_is_rejected() {
        let record: ImportRecord =
            serde_json::from_str(r#"{"name":"Mail","username":"me","category":"Email"}"#).unwrap();
        assert!(to_credential(&record, Utc::now()).is_err());
    }
}
