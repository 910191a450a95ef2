//! Vault module: the encrypted credential container.
//!
//! This module provides:
//! - `Credential` records and drafts (`credential`)
//! - The versioned JSON container format (`format`)
//! - Storage the container is read from and written to (`resource`)
//! - `VaultStore` with the create / open / save protocol (`store`)
//! - `Session`, the unlocked in-memory vault with lock and auto-lock (`session`)
//! - Password generation, strength and statistics, export/import helpers

pub mod analysis;
pub mod credential;
pub mod format;
pub mod generator;
pub mod resource;
pub mod session;
pub mod store;
pub mod transfer;

// Re-export the most commonly used items.
pub use credential::{Credential, CredentialDraft};
pub use format::{VaultContainer, CURRENT_VERSION};
pub use resource::{FileResource, MemoryResource, VaultResource, VaultWriter};
pub use session::{AutoLock, SearchFilter, Session, SortField, SortOrder};
pub use store::{OpenedVault, VaultHandle, VaultStore};
