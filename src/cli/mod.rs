//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::vault::{FileResource, Session, SortField, VaultStore};

/// Minimum master password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the master password for scripted use.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// Environment variable holding the replacement password for `passwd`.
pub const NEW_PASSWORD_ENV: &str = "PASSVAULT_NEW_PASSWORD";

/// PassVault CLI: offline password manager.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Offline password manager with an encrypted single-file vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault to use (default: from .passvault.toml, else "personal")
    #[arg(short, long, global = true)]
    pub vault: Option<String>,

    /// Vault directory (default: from .passvault.toml, else .passvault)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,

    /// Explicit vault file; overrides --vault and --vault-dir
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault
    Init {
        /// Display name stored in the vault (default: the vault name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Add a credential
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// Password (omit for interactive prompt)
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Generate a random password instead of prompting
        #[arg(short, long)]
        generate: bool,
    },

    /// List credentials
    List {
        /// Only show credentials whose name, username or URL contains TERM
        #[arg(short, long)]
        search: Option<String>,
        /// Only show credentials in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Sort field
        #[arg(long, value_enum, default_value = "name")]
        sort: SortArg,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show one credential
    Show {
        /// Credential id
        id: String,
        /// Print the password in clear text
        #[arg(short, long)]
        reveal: bool,
        /// Copy the password to the clipboard
        #[arg(short = 'C', long)]
        copy: bool,
    },

    /// Edit a credential (prompts for fields not given as flags)
    Edit {
        /// Credential id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a credential
    Delete {
        /// Credential id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        #[arg(short, long, default_value = "20")]
        length: usize,
        #[arg(long)]
        no_symbols: bool,
        #[arg(long)]
        no_digits: bool,
        #[arg(long)]
        no_uppercase: bool,
    },

    /// Show vault health statistics
    Stats,

    /// Export credentials as plaintext JSON
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import credentials from a JSON export
    Import {
        /// Path to the file to import
        input: PathBuf,
    },

    /// Change the vault's master password
    Passwd,

    /// Interactive session with idle auto-lock
    Shell,

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// `--sort` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortArg {
    Name,
    Category,
    Created,
    Updated,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortField::Name,
            SortArg::Category => SortField::Category,
            SortArg::Created => SortField::CreatedAt,
            SortArg::Updated => SortField::UpdatedAt,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved invocation context
// ---------------------------------------------------------------------------

/// Where the selected vault lives, after merging flags with settings.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    /// Vault name, used for display and in the audit log.
    pub vault: String,
    /// Directory holding the vault file and the audit database.
    pub vault_dir: PathBuf,
    pub vault_path: PathBuf,
}

impl Context {
    /// Resolve the vault location from the CLI arguments and the
    /// working directory's `.passvault.toml`.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::resolve_in(cli, &cwd)
    }

    pub fn resolve_in(cli: &Cli, cwd: &Path) -> Result<Self> {
        let mut settings = Settings::load(cwd)?;
        if let Some(dir) = &cli.vault_dir {
            settings.vault_dir.clone_from(dir);
        }

        if let Some(file) = &cli.file {
            let vault_path = cwd.join(file);
            let vault = vault_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let vault_dir = vault_path
                .parent()
                .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
            return Ok(Self {
                settings,
                vault,
                vault_dir,
                vault_path,
            });
        }

        let vault = cli
            .vault
            .clone()
            .unwrap_or_else(|| settings.default_vault.clone());
        validate_vault_name(&vault)?;

        let vault_path = settings.vault_path(cwd, &vault);
        let vault_dir = cwd.join(&settings.vault_dir);
        Ok(Self {
            settings,
            vault,
            vault_dir,
            vault_path,
        })
    }

    pub fn resource(&self) -> FileResource {
        FileResource::new(&self.vault_path)
    }

    /// Record an audit event unless disabled in settings.
    pub fn audit(&self, operation: &str, credential_id: Option<&str>, details: Option<&str>) {
        if self.settings.audit_log {
            crate::audit::log_audit(
                &self.vault_dir,
                &self.vault,
                operation,
                credential_id,
                details,
            );
        }
    }

    /// Prompt for the master password and unlock the vault.
    pub fn open_session(&self) -> Result<Session<FileResource>> {
        let resource = self.resource();
        if !resource.exists() {
            output::tip("Run `passvault init` to create a vault.");
            return Err(PassVaultError::VaultNotFound(self.vault_path.clone()));
        }

        let password = prompt_password()?;
        let session = Session::open(VaultStore::new(), password, resource)?;
        self.audit("opened", None, None);
        Ok(session.with_auto_lock(self.settings.auto_lock()))
    }

    /// Persist `session` and record the save.
    pub fn save(&self, session: &Session<FileResource>) -> Result<()> {
        session.save()?;
        let count = session.credentials()?.len();
        self.audit("saved", None, Some(&format!("{count} credential(s)")));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// `env_var` is checked first for scripted use. Enforces a minimum length.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(env_var) {
        check_password_length(&pw)?;
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if let Err(e) = check_password_length(&password) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(password);
    }
}

fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .map(Zeroizing::new)
        .filter(|pw| !pw.is_empty())
}

fn check_password_length(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PassVaultError::Validation(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Ask a yes/no question; `false` means the user declined.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Validate that a vault name is safe to use as a file name.
///
/// Allowed: lowercase letters, digits, hyphens. Must not be empty
/// or start/end with a hyphen. Max length 64 characters.
pub fn validate_vault_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PassVaultError::Validation("vault name cannot be empty".into()));
    }

    if name.len() > 64 {
        return Err(PassVaultError::Validation(
            "vault name cannot exceed 64 characters".into(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(PassVaultError::Validation(format!(
            "vault name '{name}' is invalid: only lowercase letters, digits, and hyphens are allowed"
        )));
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(PassVaultError::Validation(format!(
            "vault name '{name}' cannot start or end with a hyphen"
        )));
    }

    Ok(())
}
