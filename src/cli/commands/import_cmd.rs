//! `passvault import`: add credentials from a JSON export.
//!
//! Accepts the document written by `passvault export` or a bare array of
//! credential records. Records whose id already exists are skipped.

use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{PassVaultError, Result};
use crate::vault::transfer::import_into;

/// Execute the `import` command.
pub fn execute(ctx: &Context, file: &Path) -> Result<()> {
    if !file.exists() {
        return Err(PassVaultError::CommandFailed(format!(
            "import file not found: {}",
            file.display()
        )));
    }
    let bytes = Zeroizing::new(std::fs::read(file)?);

    let mut session = ctx.open_session()?;
    let result = import_into(&mut session, &bytes)?;

    if result.imported > 0 {
        ctx.save(&session)?;
    }

    ctx.audit(
        "import",
        None,
        Some(&format!(
            "{} imported, {} skipped, {} rejected",
            result.imported,
            result.skipped,
            result.errors.len()
        )),
    );

    output::success(&format!(
        "Imported {} credential(s) from {}",
        result.imported,
        file.display()
    ));
    if result.skipped > 0 {
        output::info(&format!(
            "Skipped {} credential(s) already in the vault.",
            result.skipped
        ));
    }
    for error in &result.errors {
        output::warning(error);
    }

    Ok(())
}
