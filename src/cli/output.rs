//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::analysis::{PasswordStrength, StrengthLevel, VaultStats, OLD_PASSWORD_DAYS};
use crate::vault::Credential;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of credentials (ID, Name, Username, Category, URL, Updated).
/// Passwords are never shown here.
pub fn print_credentials_table(credentials: &[&Credential]) {
    if credentials.is_empty() {
        info("No credentials found.");
        tip("Run `passvault add` to add your first credential.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Username", "Category", "URL", "Updated"]);

    for c in credentials {
        table.add_row(vec![
            c.id.clone(),
            c.name.clone(),
            c.username.clone(),
            c.category.clone(),
            c.url.clone(),
            c.updated_at.format(TIME_FORMAT).to_string(),
        ]);
    }

    println!("{table}");
}

/// Print every field of one credential. The password is masked unless
/// `reveal` is set.
pub fn print_credential(credential: &Credential, reveal: bool) {
    let password = if reveal {
        credential.password.clone()
    } else {
        mask(&credential.password)
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["ID".to_string(), credential.id.clone()]);
    table.add_row(vec!["Name".to_string(), credential.name.clone()]);
    table.add_row(vec!["Username".to_string(), credential.username.clone()]);
    table.add_row(vec!["Password".to_string(), password]);
    table.add_row(vec!["URL".to_string(), credential.url.clone()]);
    table.add_row(vec!["Category".to_string(), credential.category.clone()]);
    table.add_row(vec!["Notes".to_string(), credential.notes.clone()]);
    table.add_row(vec![
        "Created".to_string(),
        credential.created_at.format(TIME_FORMAT).to_string(),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        credential.updated_at.format(TIME_FORMAT).to_string(),
    ]);

    println!("{table}");
}

/// Print a strength verdict with its feedback hints.
pub fn print_strength(strength: &PasswordStrength) {
    let label = strength.level.to_string();
    let styled = match strength.level {
        StrengthLevel::Weak => style(label).red().bold(),
        StrengthLevel::Fair => style(label).yellow().bold(),
        StrengthLevel::Good => style(label).cyan().bold(),
        StrengthLevel::Strong => style(label).green().bold(),
    };
    println!("Strength: {styled} ({}/7)", strength.score);
    for hint in &strength.feedback {
        tip(hint);
    }
}

/// Print vault statistics.
pub fn print_stats(vault_name: &str, stats: &VaultStats) {
    let last_modified = stats
        .last_modified
        .map_or_else(|| "-".to_string(), |t| t.format(TIME_FORMAT).to_string());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Vault", vault_name]);
    table.add_row(vec!["Credentials".to_string(), stats.total_credentials.to_string()]);
    table.add_row(vec!["Categories".to_string(), stats.categories_count.to_string()]);
    table.add_row(vec!["Last modified".to_string(), last_modified]);
    table.add_row(vec!["Weak passwords".to_string(), stats.weak_passwords.to_string()]);
    table.add_row(vec![
        "Reused passwords".to_string(),
        stats.duplicate_passwords.to_string(),
    ]);
    table.add_row(vec![
        format!("Older than {OLD_PASSWORD_DAYS} days"),
        stats.old_passwords.to_string(),
    ]);

    println!("{table}");
}

fn mask(password: &str) -> String {
    "\u{2022}".repeat(password.chars().count().clamp(8, 16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_hides_length_extremes() {
        assert_eq!(mask("ab").chars().count(), 8);
        assert_eq!(mask(&"x".repeat(40)).chars().count(), 16);
        assert!(!mask("secret123").contains("secret"));
    }
}
