//! `passvault add`: add a credential.
//!
//! Fields not given as flags are prompted for. With `--generate` the
//! password is generated instead of typed.

use dialoguer::{Input, Password};
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{PassVaultError, Result};
use crate::vault::analysis::assess_password;
use crate::vault::credential::SUGGESTED_CATEGORIES;
use crate::vault::generator::{generate_password, GeneratorOptions};
use crate::vault::CredentialDraft;

/// Flag values for `add`.
#[derive(Default)]
pub struct AddArgs {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub generate: bool,
}

/// Execute the `add` command.
pub fn execute(ctx: &Context, args: AddArgs) -> Result<()> {
    let mut session = ctx.open_session()?;

    let password = match (args.password, args.generate) {
        (Some(pw), _) => Zeroizing::new(pw),
        (None, true) => {
            let pw = generate_password(&GeneratorOptions::default())?;
            output::info("Generated a 20 character password.");
            pw
        }
        (None, false) => prompt_secret("Password")?,
    };

    // Optional fields are only prompted for when some required one was too.
    let interactive = args.name.is_none() || args.username.is_none() || args.category.is_none();

    let draft = CredentialDraft {
        name: field_or_prompt(args.name, "Name", None)?,
        username: field_or_prompt(args.username, "Username", None)?,
        password: password.to_string(),
        url: optional_field(args.url, "URL", interactive)?,
        notes: optional_field(args.notes, "Notes", interactive)?,
        category: field_or_prompt(args.category, "Category", Some(SUGGESTED_CATEGORIES))?,
    };

    let (id, name) = {
        let credential = session.add(&draft)?;
        (credential.id.clone(), credential.name.clone())
    };
    ctx.save(&session)?;

    ctx.audit("add", Some(&id), Some(&name));
    output::success(&format!("Added '{name}' ({id})"));

    let strength = assess_password(&password);
    output::print_strength(&strength);

    Ok(())
}

/// Use `value` if given, else prompt for a required field.
pub(crate) fn field_or_prompt(
    value: Option<String>,
    prompt: &str,
    suggestions: Option<&[&str]>,
) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    if let Some(list) = suggestions {
        output::tip(&format!("Suggestions: {}", list.join(", ")));
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| PassVaultError::CommandFailed(format!("{prompt} prompt: {e}")))
}

/// Use `value` if given, else prompt for an optional field (may be empty).
fn optional_field(value: Option<String>, prompt: &str, interactive: bool) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    if !interactive {
        return Ok(String::new());
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PassVaultError::CommandFailed(format!("{prompt} prompt: {e}")))
}

/// Hidden prompt with confirmation for a credential password.
pub(crate) fn prompt_secret(prompt: &str) -> Result<Zeroizing<String>> {
    let pw = Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match, try again")
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}
