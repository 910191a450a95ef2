//! Key material wrappers.
//!
//! A derived key lives only for the duration of a single encrypt or
//! decrypt call and is zeroed when dropped.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a derived AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// A 32-byte symmetric key that automatically zeroes its memory when
/// dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Create a new `DerivedKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        // Only compared in tests; constant time is not required.
        self.bytes == other.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let key = DerivedKey::new([0x42; KEY_LEN]);
        let shown = format!("{key:?}");
        assert!(!shown.contains("42"));
        assert!(shown.contains("redacted"));
    }

    #[test]
    fn zeroize_clears_bytes() {
        let mut key = DerivedKey::new([0xAB; KEY_LEN]);
        key.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; KEY_LEN]);
    }
}
