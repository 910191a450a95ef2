//! `passvault export`: write all credentials as plaintext JSON.
//!
//! The output is NOT encrypted. It is meant for migrating to another
//! vault or tool and should be deleted afterwards.

use std::io::Write;
use std::path::Path;

use chrono::Utc;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{PassVaultError, Result};
use crate::vault::format::FILE_EXTENSION;
use crate::vault::transfer::ExportData;

/// Execute the `export` command.
pub fn execute(ctx: &Context, output_path: Option<&Path>) -> Result<()> {
    // Refuse to overwrite vault files before asking for a password.
    if let Some(dest) = output_path {
        check_destination(dest)?;
    }

    let session = ctx.open_session()?;
    let credentials = session.credentials()?;
    let json = ExportData::new(session.name()?, credentials, Utc::now()).to_json()?;

    ctx.audit(
        "export",
        None,
        Some(&format!("{} credential(s)", credentials.len())),
    );

    match output_path {
        Some(dest) => {
            write_private(dest, &json)?;
            output::success(&format!(
                "Exported {} credential(s) to {}",
                credentials.len(),
                dest.display()
            ));
            output::warning("The export file is NOT encrypted. Delete it once you are done.");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&json)?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

fn check_destination(dest: &Path) -> Result<()> {
    if dest
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION))
    {
        return Err(PassVaultError::CommandFailed(
            "refusing to export over a .vault file".into(),
        ));
    }
    Ok(())
}

/// Write `bytes` to `path`, readable only by the owner on Unix.
fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| {
        PassVaultError::CommandFailed(format!("failed to write export file: {e}"))
    })?;
    file.write_all(bytes)?;
    Ok(())
}
