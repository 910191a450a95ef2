//! `passvault stats`: vault health summary.

use chrono::Utc;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::vault::analysis::VaultStats;

/// Execute the `stats` command.
pub fn execute(ctx: &Context) -> Result<()> {
    let session = ctx.open_session()?;
    let stats = VaultStats::compute(session.credentials()?, Utc::now());

    output::print_stats(session.name()?, &stats);

    if stats.weak_passwords > 0 || stats.duplicate_passwords > 0 {
        output::tip("Run `passvault generate` and `passvault edit <ID>` to replace weak or reused passwords.");
    }

    Ok(())
}
