//! `passvault init`: create a new, empty vault.

use std::fs;

use crate::cli::output;
use crate::cli::{confirm, prompt_new_password, Context, PASSWORD_ENV};
use crate::errors::{PassVaultError, Result};
use crate::vault::{Session, VaultStore};

/// Execute the `init` command.
pub fn execute(ctx: &Context, display_name: Option<&str>) -> Result<()> {
    // 1. Refuse to clobber an existing vault without asking.
    if ctx.vault_path.exists() {
        let overwrite = confirm(
            &format!(
                "A vault already exists at {}. Overwrite it? All its credentials will be lost",
                ctx.vault_path.display()
            ),
            false,
        )?;
        if !overwrite {
            return Err(PassVaultError::UserCancelled);
        }
    }

    // 2. Create the vault directory if it doesn't exist.
    if let Some(dir) = ctx.vault_path.parent() {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            output::info(&format!("Created vault directory: {}", dir.display()));
        }
    }

    // 3. Prompt for a new password (with confirmation) and write the vault.
    let password = prompt_new_password(PASSWORD_ENV)?;
    let name = display_name.unwrap_or(&ctx.vault);
    let session = Session::create(VaultStore::new(), name, password, ctx.resource())?;

    ctx.audit("created", None, Some(session.name()?));
    output::success(&format!(
        "Vault '{}' created at {}",
        session.name()?,
        ctx.vault_path.display()
    ));

    output::tip("Run `passvault add` to add a credential.");
    output::tip("Run `passvault generate` to create a strong password.");

    Ok(())
}
