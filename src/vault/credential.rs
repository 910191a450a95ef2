//! Credential records stored inside a vault.
//!
//! The whole list is serialized as a JSON array and encrypted as one
//! payload, so unlike the container metadata nothing in here is ever
//! written to disk in the clear.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{PassVaultError, Result};

/// A single secret entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Opaque identifier, assigned at creation and never changed.
    pub id: String,

    pub name: String,

    pub username: String,

    pub password: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub notes: String,

    /// Free-text label.
    #[serde(default)]
    pub category: String,

    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,

    #[zeroize(skip)]
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .field("category", &self.category)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

impl Credential {
    /// Build a new credential from a validated draft, with a fresh id.
    pub fn new(draft: &CredentialDraft, now: DateTime<Utc>) -> Result<Self> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name.trim().to_string(),
            username: draft.username.trim().to_string(),
            password: draft.password.trim().to_string(),
            url: draft.url.trim().to_string(),
            notes: draft.notes.trim().to_string(),
            category: draft.category.trim().to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields in place, keeping `id` and `created_at`.
    ///
    /// `updated_at` never moves before `created_at`, even with a skewed clock.
    pub fn apply(&mut self, draft: &CredentialDraft, now: DateTime<Utc>) -> Result<()> {
        draft.validate()?;
        self.name = draft.name.trim().to_string();
        self.username = draft.username.trim().to_string();
        self.password.zeroize();
        self.password = draft.password.trim().to_string();
        self.url = draft.url.trim().to_string();
        self.notes = draft.notes.trim().to_string();
        self.category = draft.category.trim().to_string();
        self.updated_at = now.max(self.created_at);
        Ok(())
    }

    /// The editable fields of this credential, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> CredentialDraft {
        CredentialDraft {
            name: self.name.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            url: self.url.clone(),
            notes: self.notes.clone(),
            category: self.category.clone(),
        }
    }
}

/// The user-editable part of a credential, as collected by a form.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct CredentialDraft {
    pub name: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
    pub category: String,
}

impl CredentialDraft {
    /// Name, username, password and category are mandatory.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("username", &self.username),
            ("password", &self.password),
            ("category", &self.category),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PassVaultError::Validation(format!(
                    "credential {field} cannot be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Suggested categories offered by the interactive prompts.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "Email",
    "Social",
    "Work",
    "Banking",
    "Shopping",
    "Streaming",
    "Games",
    "Education",
    "Health",
    "Other",
];
