//! `passvault passwd`: change the vault master password.
//!
//! The whole credential list is re-encrypted under the new password with a
//! fresh salt and nonce. The vault file is only replaced once encryption
//! has succeeded.

use crate::cli::output;
use crate::cli::{prompt_new_password, Context, NEW_PASSWORD_ENV};
use crate::errors::{PassVaultError, Result};

/// Execute the `passwd` command.
pub fn execute(ctx: &Context) -> Result<()> {
    output::info("Enter your current master password.");
    let mut session = ctx.open_session()?;

    output::info("Choose your new master password.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;
    if session.verify_master_password(&new_password)? {
        return Err(PassVaultError::Validation(
            "the new master password must differ from the current one".into(),
        ));
    }

    session.replace_master_password(new_password)?;

    let count = session.credentials()?.len();
    ctx.audit("passwd", None, Some(&format!("{count} credential(s) re-encrypted")));
    output::success(&format!(
        "Master password changed ({count} credential(s) re-encrypted)."
    ));

    Ok(())
}
