//! Integration tests for the PassVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`. The
//! master password is supplied through `PASSVAULT_PASSWORD` so nothing
//! prompts; every run happens in its own temp directory.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "correcthorse1";

/// Helper: a Command pointing at the passvault binary, run inside `dir`.
fn passvault(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("passvault").expect("binary should exist");
    cmd.current_dir(dir.path())
        .env("PASSVAULT_PASSWORD", PASSWORD)
        .env_remove("PASSVAULT_NEW_PASSWORD");
    cmd
}

/// Create the default vault in `dir`.
fn init(dir: &TempDir) {
    passvault(dir).arg("init").assert().success();
}

/// Add a credential and return its id (parsed from "Added 'name' (id)").
fn add(dir: &TempDir, name: &str, category: &str) -> String {
    let out = passvault(dir)
        .args([
            "add",
            "--name",
            name,
            "--username",
            "alice",
            "--password",
            "s3cret-Passw0rd!",
            "--category",
            category,
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    let start = text.find('(').expect("id in output") + 1;
    let end = text[start..].find(')').expect("closing paren") + start;
    text[start..end].to_string()
}

#[test]
fn help_flag_shows_usage() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Offline password manager"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("passwd"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn version_flag_shows_version() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}

#[test]
fn no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn init_creates_vault_file() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .args(["init", "--name", "Personal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault 'Personal' created"));

    let vault = dir.child(".passvault/personal.vault");
    vault.assert(predicate::path::exists());
    vault.assert(predicate::str::contains("\"version\": \"1.0\""));
    vault.assert(predicate::str::contains("\"name\": \"Personal\""));
}

#[test]
fn init_rejects_short_password() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .env("PASSVAULT_PASSWORD", "short")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
}

#[test]
fn list_on_missing_vault_fails() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault not found"));
}

#[test]
fn invalid_vault_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .args(["--vault", "My.Vault", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn add_list_show_roundtrip() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let id = add(&dir, "GitHub", "Work");

    passvault(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("personal: 1 credential(s)"))
        .stdout(predicate::str::contains("s3cret-Passw0rd!").not());

    passvault(&dir)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("s3cret-Passw0rd!").not());

    passvault(&dir)
        .args(["show", &id, "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret-Passw0rd!"));
}

#[test]
fn list_filters_by_search_and_category() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(&dir, "GitHub", "Work");
    add(&dir, "Gmail", "Email");

    passvault(&dir)
        .args(["list", "--category", "Email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gmail"))
        .stdout(predicate::str::contains("personal: 1 of 2 credential(s) match"))
        .stdout(predicate::str::contains("GitHub").not());

    passvault(&dir)
        .args(["list", "--search", "hub"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("Gmail").not());
}

#[test]
fn wrong_password_fails_authentication() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    passvault(&dir)
        .env("PASSVAULT_PASSWORD", "wrongpass123")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));
}

#[test]
fn edit_and_delete() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let id = add(&dir, "GitHub", "Work");

    passvault(&dir)
        .args(["edit", &id, "--username", "octocat"])
        .assert()
        .success();
    passvault(&dir)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("octocat"));

    passvault(&dir)
        .args(["delete", &id, "--force"])
        .assert()
        .success();
    passvault(&dir)
        .args(["show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn generate_respects_flags() {
    let dir = TempDir::new().unwrap();
    let out = passvault(&dir)
        .args(["generate", "--length", "32", "--no-symbols"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    let password = text.lines().next().unwrap();
    assert_eq!(password.len(), 32);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn generate_rejects_tiny_length() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .args(["generate", "--length", "2"])
        .assert()
        .failure();
}

#[test]
fn export_and_import_between_vaults() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(&dir, "GitHub", "Work");
    add(&dir, "Gmail", "Email");

    passvault(&dir)
        .args(["export", "--output", "backup.json"])
        .assert()
        .success();
    dir.child("backup.json")
        .assert(predicate::str::contains("\"credentialsCount\": 2"));

    passvault(&dir)
        .args(["--vault", "work", "init"])
        .assert()
        .success();
    passvault(&dir)
        .args(["--vault", "work", "import", "backup.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 credential(s)"));

    // Importing again skips everything.
    passvault(&dir)
        .args(["--vault", "work", "import", "backup.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped 2"));
}

#[test]
fn export_refuses_vault_destination() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    passvault(&dir)
        .args(["export", "--output", "other.vault"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing"));
}

#[test]
fn passwd_changes_master_password() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(&dir, "GitHub", "Work");

    passvault(&dir)
        .env("PASSVAULT_NEW_PASSWORD", "n3w-master-pw")
        .arg("passwd")
        .assert()
        .success();

    passvault(&dir).arg("list").assert().failure();
    passvault(&dir)
        .env("PASSVAULT_PASSWORD", "n3w-master-pw")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"));
}

#[test]
fn stats_reports_counts() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(&dir, "GitHub", "Work");
    add(&dir, "Gmail", "Email");

    passvault(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Credentials"))
        .stdout(predicate::str::contains("Reused passwords"));
}

#[test]
fn settings_file_changes_default_vault() {
    let dir = TempDir::new().unwrap();
    dir.child(".passvault.toml")
        .write_str("default_vault = \"family\"\nvault_dir = \"vaults\"\n")
        .unwrap();

    init(&dir);
    dir.child("vaults/family.vault")
        .assert(predicate::path::exists());
}

#[test]
fn shell_reads_commands_until_exit() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(&dir, "GitHub", "Work");

    passvault(&dir)
        .arg("shell")
        .write_stdin("list\ncategories\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("Work"));
}

#[cfg(feature = "audit-log")]
#[test]
fn audit_log_records_operations() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    add(&dir, "GitHub", "Work");

    passvault(&dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("s3cret-Passw0rd!").not());
}

#[test]
fn completions_generate_script() {
    let dir = TempDir::new().unwrap();
    passvault(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}
