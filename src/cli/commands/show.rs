//! `passvault show`: display one credential, optionally copying its
//! password to the clipboard.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{PassVaultError, Result};

/// Execute the `show` command.
pub fn execute(ctx: &Context, id: &str, reveal: bool, copy: bool) -> Result<()> {
    let session = ctx.open_session()?;
    let credential = session.get(id)?;

    output::print_credential(credential, reveal);

    if copy {
        if !ctx.settings.clipboard {
            return Err(PassVaultError::ConfigError(
                "clipboard access is disabled in .passvault.toml".into(),
            ));
        }
        copy_to_clipboard(&credential.password)?;
        output::success("Password copied to clipboard.");
    }

    Ok(())
}

/// Put `text` on the system clipboard.
pub(crate) fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| PassVaultError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| PassVaultError::ClipboardError(e.to_string()))
}
