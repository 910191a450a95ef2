//! `passvault delete`: remove a credential from the vault.

use crate::cli::output;
use crate::cli::{confirm, Context};
use crate::errors::{PassVaultError, Result};

/// Execute the `delete` command.
pub fn execute(ctx: &Context, id: &str, force: bool) -> Result<()> {
    let mut session = ctx.open_session()?;
    let name = session.get(id)?.name.clone();

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete '{name}'?"), false)? {
        return Err(PassVaultError::UserCancelled);
    }

    session.remove(id)?;
    ctx.save(&session)?;

    ctx.audit("delete", Some(id), Some(&name));
    output::success(&format!("Deleted '{name}'"));

    Ok(())
}
