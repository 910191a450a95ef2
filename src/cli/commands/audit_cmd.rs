//! `passvault audit`: display the audit log.
//!
//! Usage:
//!   passvault audit               # show last 50 entries
//!   passvault audit --last 20     # show last 20
//!   passvault audit --since 7d    # entries from last 7 days

use chrono::Utc;

use crate::audit::AuditEntry;
use crate::cli::output;
use crate::cli::Context;
use crate::errors::{PassVaultError, Result};

/// Execute the `audit` command.
pub fn execute(ctx: &Context, last: usize, since: Option<&str>) -> Result<()> {
    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    if !ctx.vault_dir.is_dir() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let entries = crate::audit::recent(&ctx.vault_dir, last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, duration_of): (&str, fn(i64) -> chrono::Duration) =
        if let Some(s) = input.strip_suffix('d') {
            (s, chrono::Duration::days)
        } else if let Some(s) = input.strip_suffix('h') {
            (s, chrono::Duration::hours)
        } else if let Some(s) = input.strip_suffix('m') {
            (s, chrono::Duration::minutes)
        } else {
            return Err(PassVaultError::CommandFailed(format!(
                "invalid duration '{input}': use a format like 7d, 24h, or 30m"
            )));
        };

    let num: i64 = num_str.parse().map_err(|_| {
        PassVaultError::CommandFailed(format!(
            "invalid duration '{input}': number part is not valid"
        ))
    })?;

    Ok(Utc::now() - duration_of(num))
}

/// Print audit entries in a formatted table.
fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Vault", "Credential", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.vault.clone(),
            entry.credential_id.as_deref().unwrap_or("-").to_string(),
            entry.details.as_deref().unwrap_or("-").to_string(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "created" | "add" | "import" => style(op).green().to_string(),
        "opened" | "saved" | "edit" => style(op).blue().to_string(),
        "delete" | "error" => style(op).red().to_string(),
        "passwd" | "locked" => style(op).yellow().to_string(),
        "export" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_days() {
        let dt = parse_duration("7d").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_days() - 7).abs() <= 1);
    }

    #[test]
    fn parse_duration_hours() {
        let dt = parse_duration("24h").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_hours() - 24).abs() <= 1);
    }

    #[test]
    fn parse_duration_minutes() {
        let dt = parse_duration("30m").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("7x").is_err());
        assert!(parse_duration("d").is_err());
    }

    #[test]
    fn colorize_operation_returns_string() {
        assert!(!colorize_operation("created").is_empty());
        assert!(!colorize_operation("locked").is_empty());
        assert!(!colorize_operation("unknown").is_empty());
    }

    #[cfg(feature = "audit-log")]
    #[test]
    fn since_filter_includes_recent_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        crate::audit::log_audit(dir.path(), "personal", "opened", None, None);

        let since = parse_duration("1h").unwrap();
        let entries = crate::audit::recent(dir.path(), 10, Some(since)).unwrap();
        assert_eq!(entries.len(), 1);
    }
}
