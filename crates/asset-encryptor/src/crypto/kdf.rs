//! Key derivation: SHA-256 over `"{signature}-{device_id}-{salt}"`.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Static salt appended to every derivation input.
pub const FIXED_SALT: &str = "NEQUIX2025";

/// Device id used for build-time derivation.
pub const DEFAULT_DEVICE_ID: &str = "DEFAULT_BUILD";

/// Stand-in for the signing certificate fingerprint.
pub const SIGNATURE_PLACEHOLDER: &str = "BUILD_TIME_SIGNATURE_PLACEHOLDER";

/// Derived AES-256 key.
///
/// Lives for a single invocation. The bytes are overwritten with zeroes on drop
/// and never appear in `Debug` output.
#[derive(PartialEq, Eq)]
pub struct KeyMaterial([u8; KEY_LEN]);

impl KeyMaterial {
    /// Raw key bytes, for handing to the cipher.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl From<[u8; KEY_LEN]> for KeyMaterial {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

/// Derive the asset key from a signature and a device id.
///
/// Deterministic: identical inputs always give the same key.
pub fn derive_key(signature: &str, device_id: &str) -> KeyMaterial {
    let mut combined = format!("{signature}-{device_id}-{FIXED_SALT}");
    let mut hasher = Sha256::new();
    hasher.update(combined.as_bytes());
    combined.zeroize();
    KeyMaterial(hasher.finalize().into())
}
