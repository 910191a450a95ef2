//! `passvault edit`: change a credential's fields.
//!
//! Fields given as flags are applied directly. With no flags at all, every
//! field is prompted for, prefilled with its current value; an empty
//! password answer keeps the current password.

use dialoguer::{Input, Password};

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{PassVaultError, Result};
use crate::vault::analysis::assess_password;

/// Flag values for `edit`.
#[derive(Default)]
pub struct EditArgs {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

impl EditArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.url.is_none()
            && self.category.is_none()
            && self.notes.is_none()
    }
}

/// Execute the `edit` command.
pub fn execute(ctx: &Context, id: &str, args: EditArgs) -> Result<()> {
    let mut session = ctx.open_session()?;
    let mut draft = session.get(id)?.to_draft();
    let interactive = args.is_empty();
    let password_changed = args.password.is_some();

    if interactive {
        draft.name = prompt_with_default("Name", &draft.name)?;
        draft.username = prompt_with_default("Username", &draft.username)?;
        let new_password = Password::new()
            .with_prompt("Password (leave empty to keep)")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;
        if !new_password.is_empty() {
            draft.password = new_password;
        }
        draft.url = prompt_with_default("URL", &draft.url)?;
        draft.category = prompt_with_default("Category", &draft.category)?;
        draft.notes = prompt_with_default("Notes", &draft.notes)?;
    } else {
        let EditArgs {
            name,
            username,
            password,
            url,
            category,
            notes,
        } = args;
        if let Some(v) = name {
            draft.name = v;
        }
        if let Some(v) = username {
            draft.username = v;
        }
        if let Some(v) = password {
            draft.password = v;
        }
        if let Some(v) = url {
            draft.url = v;
        }
        if let Some(v) = category {
            draft.category = v;
        }
        if let Some(v) = notes {
            draft.notes = v;
        }
    }

    let name = session.update(id, &draft)?.name.clone();
    ctx.save(&session)?;

    ctx.audit("edit", Some(id), Some(&name));
    output::success(&format!("Updated '{name}'"));

    if password_changed {
        output::print_strength(&assess_password(&draft.password));
    }

    Ok(())
}

fn prompt_with_default(prompt: &str, current: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PassVaultError::CommandFailed(format!("{prompt} prompt: {e}")))
}
