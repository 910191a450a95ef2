use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
///
/// None of the variants ever carry the master password, a derived key,
/// or plaintext credential data.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed: wrong password or corrupted vault data")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Random number generator failed: {0}")]
    RandomnessFailed(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Unsupported vault format version '{0}'")]
    UnsupportedVersion(String),

    #[error("Credential '{0}' not found")]
    CredentialNotFound(String),

    #[error("Vault is locked")]
    VaultLocked,

    // --- Input errors ---
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password mismatch: passwords do not match")]
    PasswordMismatch,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Coarse classification callers use to decide how to react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The user abandoned the operation. Not a data error.
    UserCancelled,
    /// Malformed or unsupported container or plaintext.
    Format,
    /// AEAD tag verification failed.
    Authentication,
    /// The vault resource could not be read or written.
    Io,
    /// Caller-supplied input violates a precondition.
    Validation,
    /// Everything else.
    Other,
}

impl ErrorKind {
    /// Only a failed authentication is worth retrying, with a different password.
    pub fn is_retryable(self) -> bool {
        self == ErrorKind::Authentication
    }
}

impl PassVaultError {
    /// Map this error onto the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserCancelled => ErrorKind::UserCancelled,
            Self::InvalidVaultFormat(_) | Self::UnsupportedVersion(_) => ErrorKind::Format,
            Self::AuthenticationFailed => ErrorKind::Authentication,
            Self::Io(_) | Self::VaultNotFound(_) => ErrorKind::Io,
            Self::Validation(_) | Self::PasswordMismatch => ErrorKind::Validation,
            _ => ErrorKind::Other,
        }
    }
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(
            PassVaultError::AuthenticationFailed.kind(),
            ErrorKind::Authentication
        );
        assert_eq!(
            PassVaultError::UnsupportedVersion("2.0".into()).kind(),
            ErrorKind::Format
        );
        assert_eq!(
            PassVaultError::VaultNotFound(PathBuf::from("x.vault")).kind(),
            ErrorKind::Io
        );
        assert_eq!(PassVaultError::UserCancelled.kind(), ErrorKind::UserCancelled);
        assert_eq!(
            PassVaultError::Validation("empty".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(PassVaultError::VaultLocked.kind(), ErrorKind::Other);
    }

    #[test]
    fn only_authentication_is_retryable() {
        assert!(ErrorKind::Authentication.is_retryable());
        assert!(!ErrorKind::Format.is_retryable());
        assert!(!ErrorKind::Io.is_retryable());
    }

    #[test]
    fn authentication_message_does_not_distinguish_causes() {
        let msg = PassVaultError::AuthenticationFailed.to_string();
        assert!(msg.contains("wrong password or corrupted"));
    }
}
