//! Create / open / save protocol for vault containers.
//!
//! `VaultStore` ties the container format to the crypto engine and drives
//! it against a `VaultResource`. It holds no per-vault state: everything a
//! later save needs is either in the `VaultHandle` (where to write) or on
//! the resource itself (name and creation time).

use chrono::Utc;

use crate::crypto::{CryptoEngine, CryptoProvider, SystemCrypto};
use crate::errors::{PassVaultError, Result};

use super::credential::Credential;
use super::format::{self, VaultContainer};
use super::resource::{VaultResource, VaultWriter};

/// A resource known to hold a vault, returned by `create` and `open` and
/// passed back to `save`.
#[derive(Debug, Clone)]
pub struct VaultHandle<R> {
    resource: R,
}

impl<R: VaultResource> VaultHandle<R> {
    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn into_resource(self) -> R {
        self.resource
    }
}

/// The result of a successful `open`.
pub struct OpenedVault<R> {
    pub name: String,
    pub credentials: Vec<Credential>,
    pub handle: VaultHandle<R>,
}

/// Vault lifecycle operations over any crypto backend.
#[derive(Debug, Clone, Default)]
pub struct VaultStore<P: CryptoProvider = SystemCrypto> {
    engine: CryptoEngine<P>,
}

impl VaultStore<SystemCrypto> {
    pub fn new() -> Self {
        Self::with_engine(CryptoEngine::new())
    }
}

impl<P: CryptoProvider> VaultStore<P> {
    pub fn with_engine(engine: CryptoEngine<P>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &CryptoEngine<P> {
        &self.engine
    }

    /// Write a brand-new, empty vault to `resource`.
    ///
    /// Any previous content of the resource is replaced in full.
    pub fn create<R: VaultResource>(
        &self,
        name: &str,
        master_password: &str,
        resource: R,
    ) -> Result<VaultHandle<R>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PassVaultError::Validation("vault name cannot be empty".into()));
        }
        ensure_master_password(master_password)?;

        let plaintext = format::encode_credentials(&[])?;
        let payload = self.engine.encrypt(&plaintext, master_password)?;
        let container = VaultContainer::new(name, payload, Utc::now());

        write_container(&resource, &container)?;

        Ok(VaultHandle { resource })
    }

    /// Read, authenticate and decrypt the vault held by `resource`.
    ///
    /// `AuthenticationFailed` is passed through untouched; it is the only
    /// signal for both a wrong password and a damaged payload.
    pub fn open<R: VaultResource>(
        &self,
        master_password: &str,
        resource: R,
    ) -> Result<OpenedVault<R>> {
        ensure_master_password(master_password)?;

        let container = read_container(&resource)?;
        let plaintext = self.engine.decrypt(&container.payload, master_password)?;
        let credentials = format::decode_credentials(&plaintext)?;

        Ok(OpenedVault {
            name: container.name,
            credentials,
            handle: VaultHandle { resource },
        })
    }

    /// Re-encrypt the full credential list and replace the vault content.
    ///
    /// `name` and `createdAt` are carried over from the container currently
    /// on the resource. Encryption completes before the resource is touched,
    /// so a failure leaves the previous vault intact.
    pub fn save<R: VaultResource>(
        &self,
        handle: &VaultHandle<R>,
        credentials: &[Credential],
        master_password: &str,
    ) -> Result<()> {
        ensure_master_password(master_password)?;

        let current = read_container(&handle.resource)?;

        let plaintext = format::encode_credentials(credentials)?;
        let payload = self.engine.encrypt(&plaintext, master_password)?;
        let next = current.with_payload(payload, Utc::now());

        write_container(&handle.resource, &next)
    }

    /// Read only the unencrypted metadata of a vault (no password needed).
    pub fn inspect<R: VaultResource>(&self, resource: &R) -> Result<VaultContainer> {
        read_container(resource)
    }
}

fn ensure_master_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(PassVaultError::Validation(
            "master password cannot be empty".into(),
        ));
    }
    Ok(())
}

fn read_container<R: VaultResource>(resource: &R) -> Result<VaultContainer> {
    let bytes = resource.read_all()?;
    VaultContainer::from_bytes(&bytes)
}

fn write_container<R: VaultResource>(resource: &R, container: &VaultContainer) -> Result<()> {
    let bytes = container.to_bytes()?;
    let mut writer = resource.open_for_write()?;
    writer.write_all(&bytes)?;
    writer.commit()
}
