use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PassVaultError, Result};

/// User preferences, loaded from `.passvault.toml`.
///
/// Holds nothing secret. Every field has a sensible default so PassVault
/// works out-of-the-box without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault used when `--vault` is not given (e.g. "personal").
    #[serde(default = "default_vault")]
    pub default_vault: String,

    /// Directory (relative to the working directory) holding vault files.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Minutes of inactivity before an interactive session locks (0 = never).
    #[serde(default = "default_lock_timeout_minutes")]
    pub lock_timeout_minutes: u32,

    /// Allow copying passwords to the system clipboard.
    #[serde(default = "default_true")]
    pub clipboard: bool,

    /// Record vault operations in the audit log.
    #[serde(default = "default_true")]
    pub audit_log: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault() -> String {
    "personal".to_string()
}

fn default_vault_dir() -> String {
    ".passvault".to_string()
}

fn default_lock_timeout_minutes() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_vault: default_vault(),
            vault_dir: default_vault_dir(),
            lock_timeout_minutes: default_lock_timeout_minutes(),
            clipboard: default_true(),
            audit_log: default_true(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Build the full path to a vault file by name.
    ///
    /// Example: `dir/.passvault/personal.vault`
    pub fn vault_path(&self, dir: &Path, vault_name: &str) -> PathBuf {
        dir.join(&self.vault_dir)
            .join(format!("{vault_name}.{}", crate::vault::format::FILE_EXTENSION))
    }

    /// Idle timer for interactive sessions.
    pub fn auto_lock(&self) -> crate::vault::AutoLock {
        crate::vault::AutoLock::from_minutes(self.lock_timeout_minutes)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
