//! An unlocked vault held in memory.
//!
//! A `Session` owns the decrypted credential list and the master password
//! for as long as the vault is open. `lock()` wipes both and moves the
//! session to the locked state, after which every operation fails with
//! `VaultLocked`. Dropping a session locks it too, so secrets are wiped on
//! every exit path, early returns included.

use std::cell::Cell;
use std::cmp::Ordering;
use std::time::{Duration, Instant};

use chrono::Utc;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{CryptoProvider, SystemCrypto};
use crate::errors::{PassVaultError, Result};

use super::credential::{Credential, CredentialDraft};
use super::resource::VaultResource;
use super::store::{VaultHandle, VaultStore};

// ---------------------------------------------------------------------------
// Auto-lock
// ---------------------------------------------------------------------------

/// Idle timer: the vault should lock once no activity has been seen for
/// `timeout`. `None` disables it.
#[derive(Debug)]
pub struct AutoLock {
    timeout: Option<Duration>,
    last_activity: Cell<Instant>,
}

impl AutoLock {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            last_activity: Cell::new(Instant::now()),
        }
    }

    /// Build from a minutes setting where 0 means "never".
    pub fn from_minutes(minutes: u32) -> Self {
        let timeout = (minutes > 0).then(|| Duration::from_secs(u64::from(minutes) * 60));
        Self::new(timeout)
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Record activity now.
    pub fn touch(&self) {
        self.last_activity.set(Instant::now());
    }

    /// Time left before the timer runs out, or `None` when disabled.
    pub fn remaining(&self) -> Option<Duration> {
        self.timeout
            .map(|timeout| timeout.saturating_sub(self.last_activity.get().elapsed()))
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.timeout {
            Some(timeout) => now.saturating_duration_since(self.last_activity.get()) >= timeout,
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    Category,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Which credentials to show and in what order.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Case-insensitive substring matched against name, username and url.
    pub term: String,
    /// Exact category, or `None` for all.
    pub category: Option<String>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl SearchFilter {
    pub fn matches(&self, credential: &Credential) -> bool {
        let term = self.term.trim().to_lowercase();
        let matches_term = term.is_empty()
            || credential.name.to_lowercase().contains(&term)
            || credential.username.to_lowercase().contains(&term)
            || credential.url.to_lowercase().contains(&term);

        let matches_category = self
            .category
            .as_deref()
            .map_or(true, |category| credential.category == category);

        matches_term && matches_category
    }

    fn compare(&self, a: &Credential, b: &Credential) -> Ordering {
        let ordering = match self.sort_by {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Category => a
                .category
                .to_lowercase()
                .cmp(&b.category.to_lowercase())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct Unlocked<R> {
    name: String,
    handle: VaultHandle<R>,
    credentials: Vec<Credential>,
    master_password: Zeroizing<String>,
}

enum State<R> {
    Unlocked(Unlocked<R>),
    Locked,
}

/// The single active view of an open vault.
pub struct Session<R: VaultResource, P: CryptoProvider = SystemCrypto> {
    store: VaultStore<P>,
    state: State<R>,
    auto_lock: AutoLock,
}

impl<R: VaultResource, P: CryptoProvider> Session<R, P> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a new empty vault on `resource` and start a session on it.
    pub fn create(
        store: VaultStore<P>,
        name: &str,
        master_password: Zeroizing<String>,
        resource: R,
    ) -> Result<Self> {
        let handle = store.create(name, &master_password, resource)?;
        Ok(Self {
            store,
            state: State::Unlocked(Unlocked {
                name: name.trim().to_string(),
                handle,
                credentials: Vec::new(),
                master_password,
            }),
            auto_lock: AutoLock::disabled(),
        })
    }

    /// Open the vault on `resource` and start a session on it.
    pub fn open(store: VaultStore<P>, master_password: Zeroizing<String>, resource: R) -> Result<Self> {
        let opened = store.open(&master_password, resource)?;
        Ok(Self {
            store,
            state: State::Unlocked(Unlocked {
                name: opened.name,
                handle: opened.handle,
                credentials: opened.credentials,
                master_password,
            }),
            auto_lock: AutoLock::disabled(),
        })
    }

    /// Attach an idle timer.
    pub fn with_auto_lock(mut self, auto_lock: AutoLock) -> Self {
        self.auto_lock = auto_lock;
        self
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn is_locked(&self) -> bool {
        matches!(self.state, State::Locked)
    }

    /// Wipe the credential list and master password and drop the handle.
    ///
    /// Idempotent.
    pub fn lock(&mut self) {
        if let State::Unlocked(mut unlocked) = std::mem::replace(&mut self.state, State::Locked) {
            unlocked.credentials.zeroize();
            unlocked.master_password.zeroize();
        }
    }

    /// Lock if the idle timer has run out. Returns `true` if the session is
    /// now locked because of it.
    pub fn lock_if_idle(&mut self) -> bool {
        if !self.is_locked() && self.auto_lock.is_expired() {
            self.lock();
            return true;
        }
        false
    }

    pub fn auto_lock(&self) -> &AutoLock {
        &self.auto_lock
    }

    fn unlocked(&self) -> Result<&Unlocked<R>> {
        match &self.state {
            State::Unlocked(unlocked) => {
                self.auto_lock.touch();
                Ok(unlocked)
            }
            State::Locked => Err(PassVaultError::VaultLocked),
        }
    }

    fn unlocked_mut(&mut self) -> Result<&mut Unlocked<R>> {
        match &mut self.state {
            State::Unlocked(unlocked) => {
                self.auto_lock.touch();
                Ok(unlocked)
            }
            State::Locked => Err(PassVaultError::VaultLocked),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn name(&self) -> Result<&str> {
        Ok(&self.unlocked()?.name)
    }

    pub fn handle(&self) -> Result<&VaultHandle<R>> {
        Ok(&self.unlocked()?.handle)
    }

    pub fn credentials(&self) -> Result<&[Credential]> {
        Ok(&self.unlocked()?.credentials)
    }

    pub fn get(&self, id: &str) -> Result<&Credential> {
        self.unlocked()?
            .credentials
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| PassVaultError::CredentialNotFound(id.to_string()))
    }

    /// Credentials matching `filter`, in the order it asks for.
    pub fn filter(&self, filter: &SearchFilter) -> Result<Vec<&Credential>> {
        let mut matches: Vec<&Credential> = self
            .unlocked()?
            .credentials
            .iter()
            .filter(|c| filter.matches(c))
            .collect();
        matches.sort_by(|a, b| filter.compare(a, b));
        Ok(matches)
    }

    /// Distinct non-empty categories in use, sorted.
    pub fn categories(&self) -> Result<Vec<String>> {
        let mut categories: Vec<String> = self
            .unlocked()?
            .credentials
            .iter()
            .map(|c| c.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    // ------------------------------------------------------------------
    // Credential operations (in memory; call `save` to persist)
    // ------------------------------------------------------------------

    /// Add a new credential built from `draft`.
    pub fn add(&mut self, draft: &CredentialDraft) -> Result<&Credential> {
        let credential = Credential::new(draft, Utc::now())?;
        let unlocked = self.unlocked_mut()?;
        unlocked.credentials.push(credential);
        let last = unlocked.credentials.len() - 1;
        Ok(&unlocked.credentials[last])
    }

    /// Insert an existing record as-is (e.g. from an import).
    ///
    /// Ids must stay unique, so a record whose id is already present is
    /// rejected.
    pub fn insert(&mut self, credential: Credential) -> Result<()> {
        let unlocked = self.unlocked_mut()?;
        if unlocked.credentials.iter().any(|c| c.id == credential.id) {
            return Err(PassVaultError::Validation(format!(
                "a credential with id '{}' already exists",
                credential.id
            )));
        }
        unlocked.credentials.push(credential);
        Ok(())
    }

    /// Replace the editable fields of credential `id`.
    pub fn update(&mut self, id: &str, draft: &CredentialDraft) -> Result<&Credential> {
        let unlocked = self.unlocked_mut()?;
        let credential = unlocked
            .credentials
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| PassVaultError::CredentialNotFound(id.to_string()))?;
        credential.apply(draft, Utc::now())?;
        Ok(credential)
    }

    /// Remove credential `id`.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let unlocked = self.unlocked_mut()?;
        let index = unlocked
            .credentials
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| PassVaultError::CredentialNotFound(id.to_string()))?;
        unlocked.credentials.remove(index);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Persist the full credential list under the session's master password.
    pub fn save(&self) -> Result<()> {
        let unlocked = self.unlocked()?;
        self.store.save(
            &unlocked.handle,
            &unlocked.credentials,
            &unlocked.master_password,
        )
    }

    /// Re-encrypt the vault under `new_password`.
    ///
    /// The session keeps using the old password unless the save succeeds.
    pub fn replace_master_password(&mut self, new_password: Zeroizing<String>) -> Result<()> {
        let unlocked = self.unlocked()?;
        self.store
            .save(&unlocked.handle, &unlocked.credentials, &new_password)?;

        let unlocked = self.unlocked_mut()?;
        unlocked.master_password.zeroize();
        unlocked.master_password = new_password;
        Ok(())
    }

    /// Check `candidate` against the session's master password.
    pub fn verify_master_password(&self, candidate: &str) -> Result<bool> {
        use subtle::ConstantTimeEq;

        let unlocked = self.unlocked()?;
        Ok(unlocked
            .master_password
            .as_bytes()
            .ct_eq(candidate.as_bytes())
            .into())
    }
}

impl<R: VaultResource, P: CryptoProvider> Drop for Session<R, P> {
    fn drop(&mut self) {
        self.lock();
    }
}
