//! Audit log: SQLite-based operation history.
//!
//! Records vault lifecycle events (created, opened, saved, locked) and
//! credential operations in `<vault_dir>/audit.db`. Only operation names,
//! vault names, credential ids and short details are stored. Never secrets.
//!
//! Logging degrades gracefully: if the database can't be opened or written
//! to, the vault operation carries on without a record. Building without
//! the `audit-log` feature turns every call into a no-op.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::errors::Result;

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub vault: String,
    pub credential_id: Option<String>,
    pub details: Option<String>,
}

/// File name of the audit database inside the vault directory.
pub const DB_FILE: &str = "audit.db";

/// Return the path to the audit database (for display).
pub fn db_path(vault_dir: &Path) -> PathBuf {
    vault_dir.join(DB_FILE)
}

#[cfg(feature = "audit-log")]
mod sqlite {
    use std::path::Path;

    use chrono::{DateTime, Utc};
    use rusqlite::Connection;

    use super::{db_path, AuditEntry};
    use crate::errors::{PassVaultError, Result};

    /// SQLite-backed audit log.
    pub struct AuditLog {
        conn: Connection,
    }

    impl AuditLog {
        /// Open (or create) the audit database at `<vault_dir>/audit.db`.
        ///
        /// Returns `None` if the database can't be opened.
        pub fn open(vault_dir: &Path) -> Option<Self> {
            let path = db_path(vault_dir);
            let conn = Connection::open(&path).ok()?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = std::fs::Permissions::from_mode(0o600);
                let _ = std::fs::set_permissions(&path, perms);
            }

            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS audit_log (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp     TEXT NOT NULL,
                    operation     TEXT NOT NULL,
                    vault         TEXT NOT NULL,
                    credential_id TEXT,
                    details       TEXT
                );",
            )
            .ok()?;

            Some(Self { conn })
        }

        /// Record an operation. Errors are ignored.
        pub fn log(
            &self,
            operation: &str,
            vault: &str,
            credential_id: Option<&str>,
            details: Option<&str>,
        ) {
            let now = Utc::now().to_rfc3339();
            let _ = self.conn.execute(
                "INSERT INTO audit_log (timestamp, operation, vault, credential_id, details)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![now, operation, vault, credential_id, details],
            );
        }

        /// Most recent entries first, at most `limit`, optionally only
        /// those at or after `since`.
        pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            // RFC 3339 strings in UTC sort lexically.
            let since = since.map_or_else(String::new, |ts| ts.to_rfc3339());

            let mut stmt = self
                .conn
                .prepare(
                    "SELECT id, timestamp, operation, vault, credential_id, details
                     FROM audit_log
                     WHERE timestamp >= ?1
                     ORDER BY id DESC
                     LIMIT ?2",
                )
                .map_err(|e| PassVaultError::AuditError(format!("query prepare: {e}")))?;

            let rows = stmt
                .query_map(rusqlite::params![since, limit], |row| {
                    let ts: String = row.get(1)?;
                    let timestamp = DateTime::parse_from_rfc3339(&ts)
                        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                    Ok(AuditEntry {
                        id: row.get(0)?,
                        timestamp,
                        operation: row.get(2)?,
                        vault: row.get(3)?,
                        credential_id: row.get(4)?,
                        details: row.get(5)?,
                    })
                })
                .map_err(|e| PassVaultError::AuditError(format!("query exec: {e}")))?;

            let mut entries = Vec::new();
            for row in rows {
                entries.push(row.map_err(|e| PassVaultError::AuditError(format!("row parse: {e}")))?);
            }
            Ok(entries)
        }
    }
}

#[cfg(not(feature = "audit-log"))]
mod sqlite {
    use std::path::Path;

    use chrono::{DateTime, Utc};

    use super::AuditEntry;
    use crate::errors::{PassVaultError, Result};

    /// Stand-in used when the crate is built without `audit-log`.
    pub struct AuditLog;

    impl AuditLog {
        pub fn open(_vault_dir: &Path) -> Option<Self> {
            None
        }

        pub fn log(&self, _: &str, _: &str, _: Option<&str>, _: Option<&str>) {}

        pub fn query(&self, _: usize, _: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
            Err(PassVaultError::AuditError(
                "built without the audit-log feature".into(),
            ))
        }
    }
}

pub use sqlite::AuditLog;

/// Open the audit database, log one event, and ignore any failure.
///
/// Safe to call from any command; it never fails the parent operation.
pub fn log_audit(
    vault_dir: &Path,
    vault: &str,
    operation: &str,
    credential_id: Option<&str>,
    details: Option<&str>,
) {
    if !vault_dir.is_dir() {
        return;
    }
    if let Some(audit) = AuditLog::open(vault_dir) {
        audit.log(operation, vault, credential_id, details);
    }
}

/// Entries for display, or an `AuditError` if the log can't be opened.
pub fn recent(vault_dir: &Path, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
    let audit = AuditLog::open(vault_dir).ok_or_else(|| {
        crate::errors::PassVaultError::AuditError(format!(
            "failed to open audit database at {}",
            db_path(vault_dir).display()
        ))
    })?;
    audit.query(limit, since)
}
