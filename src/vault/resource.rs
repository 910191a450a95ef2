//! Byte-level storage the vault is read from and written to.
//!
//! The store only ever reads a resource in full and replaces it in full.
//! Replacement goes through a writer with an explicit `commit`, so a
//! writer that is dropped early (error, panic, crash) never leaves a
//! half-written vault behind.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::errors::{PassVaultError, Result};

/// Something a vault can live in.
pub trait VaultResource {
    /// Writer returned by `open_for_write`.
    type Writer: VaultWriter;

    /// Read the full current content.
    fn read_all(&self) -> Result<Vec<u8>>;

    /// Start a whole-content replacement. Nothing is visible to readers
    /// until the writer is committed.
    fn open_for_write(&self) -> Result<Self::Writer>;

    /// Human-readable location, for messages and audit entries.
    fn describe(&self) -> String;
}

/// A pending whole-content replacement.
pub trait VaultWriter {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Atomically publish everything written so far.
    fn commit(self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileResource
// ---------------------------------------------------------------------------

/// A vault file on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Temp file in the same directory, so the final rename stays on one
    /// filesystem.
    fn tmp_path(&self) -> PathBuf {
        let parent = self.path.parent().unwrap_or(Path::new("."));
        parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ))
    }
}

impl VaultResource for FileResource {
    type Writer = FileWriter;

    fn read_all(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PassVaultError::VaultNotFound(self.path.clone())
            } else {
                PassVaultError::Io(e)
            }
        })
    }

    fn open_for_write(&self) -> Result<FileWriter> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        let file = File::create(&tmp_path)?;

        // On Unix, restrict permissions to owner-only read/write.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(FileWriter {
            file: Some(file),
            tmp_path,
            target: self.path.clone(),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes to `.<name>.tmp` and renames over the target on commit.
pub struct FileWriter {
    file: Option<File>,
    tmp_path: PathBuf,
    target: PathBuf,
}

impl VaultWriter for FileWriter {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        match self.file.as_mut() {
            Some(file) => Ok(file.write_all(bytes)?),
            None => Err(PassVaultError::CommandFailed(
                "write after commit".into(),
            )),
        }
    }

    fn commit(mut self) -> Result<()> {
        let file = self
            .file
            .take()
            .ok_or_else(|| PassVaultError::CommandFailed("writer already committed".into()))?;

        let synced = file.sync_all();
        drop(file);
        let result = synced.and_then(|()| fs::rename(&self.tmp_path, &self.target));
        if result.is_err() {
            let _ = fs::remove_file(&self.tmp_path);
        }
        Ok(result?)
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        // Still holding the file means commit never ran.
        if self.file.take().is_some() {
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryResource
// ---------------------------------------------------------------------------

/// An in-memory vault. Clones share the same buffer, like two handles to
/// one file.
#[derive(Debug, Clone, Default)]
pub struct MemoryResource {
    bytes: Rc<RefCell<Option<Vec<u8>>>>,
}

impl MemoryResource {
    /// An empty resource (reads fail until the first commit).
    pub fn new() -> Self {
        Self::default()
    }

    /// A resource pre-filled with `bytes`.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Rc::new(RefCell::new(Some(bytes.into()))),
        }
    }

    /// Snapshot of the committed content.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes.borrow().clone()
    }

    /// Overwrite the committed content directly (bypassing a writer).
    pub fn set_contents(&self, bytes: impl Into<Vec<u8>>) {
        *self.bytes.borrow_mut() = Some(bytes.into());
    }
}

impl VaultResource for MemoryResource {
    type Writer = MemoryWriter;

    fn read_all(&self) -> Result<Vec<u8>> {
        self.bytes.borrow().clone().ok_or_else(|| {
            PassVaultError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "memory resource is empty",
            ))
        })
    }

    fn open_for_write(&self) -> Result<MemoryWriter> {
        Ok(MemoryWriter {
            target: Rc::clone(&self.bytes),
            pending: Vec::new(),
        })
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Buffers writes until commit.
pub struct MemoryWriter {
    target: Rc<RefCell<Option<Vec<u8>>>>,
    pending: Vec<u8>,
}

impl VaultWriter for MemoryWriter {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.pending.extend_from_slice(bytes);
        Ok(())
    }

    fn commit(self) -> Result<()> {
        *self.target.borrow_mut() = Some(self.pending);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_commit_replaces_content() {
        let dir = TempDir::new().unwrap();
        let res = FileResource::new(dir.path().join("a.vault"));

        let mut w = res.open_for_write().unwrap();
        w.write_all(b"first").unwrap();
        w.commit().unwrap();
        assert_eq!(res.read_all().unwrap(), b"first");

        let mut w = res.open_for_write().unwrap();
        w.write_all(b"second").unwrap();
        w.commit().unwrap();
        assert_eq!(res.read_all().unwrap(), b"second");
    }

    #[test]
    fn dropped_writer_leaves_target_and_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let res = FileResource::new(dir.path().join("a.vault"));
        fs::write(res.path(), b"original").unwrap();

        {
            let mut w = res.open_for_write().unwrap();
            w.write_all(b"half-writ").unwrap();
        }

        assert_eq!(res.read_all().unwrap(), b"original");
        assert!(!dir.path().join(".a.vault.tmp").exists());
    }

    #[test]
    fn missing_file_is_vault_not_found() {
        let dir = TempDir::new().unwrap();
        let res = FileResource::new(dir.path().join("missing.vault"));
        let err = res.read_all().unwrap_err();
        assert!(matches!(err, PassVaultError::VaultNotFound(_)));
    }

    #[test]
    fn creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let res = FileResource::new(dir.path().join("nested/dir/a.vault"));
        let mut w = res.open_for_write().unwrap();
        w.write_all(b"x").unwrap();
        w.commit().unwrap();
        assert!(res.exists());
    }

    #[cfg(unix)]
    #[test]
    fn committed_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let res = FileResource::new(dir.path().join("a.vault"));
        let mut w = res.open_for_write().unwrap();
        w.write_all(b"x").unwrap();
        w.commit().unwrap();

        let mode = fs::metadata(res.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn memory_writes_are_invisible_until_commit() {
        let res = MemoryResource::with_bytes(b"old".to_vec());
        let mut w = res.open_for_write().unwrap();
        w.write_all(b"new").unwrap();
        assert_eq!(res.read_all().unwrap(), b"old");
        w.commit().unwrap();
        assert_eq!(res.read_all().unwrap(), b"new");
    }

    #[test]
    fn memory_clones_share_content() {
        let a = MemoryResource::new();
        let b = a.clone();
        a.set_contents(b"shared".to_vec());
        assert_eq!(b.read_all().unwrap(), b"shared");
    }
}
