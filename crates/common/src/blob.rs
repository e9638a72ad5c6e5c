//! On-disk layout of an encrypted asset.
//!
//! ```text
//! bytes[0..16]  random IV
//! bytes[16..]   AES-CBC ciphertext, PKCS#7 padded
//! ```
//!
//! There is no header, version tag or integrity tag. The receiving side must
//! already know the key.

use crate::error::EncryptorError;

/// Byte length of the initialisation vector prefix.
pub const IV_LEN: usize = 16;

/// Cipher block size. Ciphertext length is always a non-zero multiple of it.
pub const BLOCK_LEN: usize = 16;

/// Length of the PKCS#7-padded ciphertext for a plaintext of `plaintext_len`
/// bytes. Padding always adds at least one byte, so an aligned plaintext grows
/// by a whole block.
pub fn padded_len(plaintext_len: usize) -> usize {
    (plaintext_len / BLOCK_LEN + 1) * BLOCK_LEN
}

/// Total blob length (`IV || ciphertext`) for a plaintext of `plaintext_len` bytes.
pub fn blob_len(plaintext_len: usize) -> usize {
    IV_LEN + padded_len(plaintext_len)
}

/// A parsed `IV || ciphertext` blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// Raw IV bytes.
    pub iv: [u8; IV_LEN],
    /// Raw ciphertext bytes, block aligned.
    pub ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Build a blob from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InvalidBlob`] if `ciphertext` is empty or not
    /// a multiple of [`BLOCK_LEN`].
    pub fn new(iv: [u8; IV_LEN], ciphertext: Vec<u8>) -> Result<Self, EncryptorError> {
        check_ciphertext_len(ciphertext.len())?;
        Ok(Self { iv, ciphertext })
    }

    /// Parse raw bytes read from disk.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::InvalidBlob`] if the input is shorter than an
    /// IV plus one block, or the ciphertext part is not block aligned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncryptorError> {
        if bytes.len() < IV_LEN + BLOCK_LEN {
            return Err(EncryptorError::InvalidBlob(format!(
                "expected at least {} bytes, got {}",
                IV_LEN + BLOCK_LEN,
                bytes.len()
            )));
        }
        let (iv_bytes, ciphertext) = bytes.split_at(IV_LEN);
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(iv_bytes);
        Self::new(iv, ciphertext.to_vec())
    }

    /// Serialise to the on-disk layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Total serialised length.
    pub fn len(&self) -> usize {
        IV_LEN + self.ciphertext.len()
    }

    /// Always `false` for a validated blob; present to pair with [`EncryptedBlob::len`].
    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }
}

fn check_ciphertext_len(len: usize) -> Result<(), EncryptorError> {
    if len == 0 || len % BLOCK_LEN != 0 {
        return Err(EncryptorError::InvalidBlob(format!(
            "ciphertext length {len} is not a non-zero multiple of {BLOCK_LEN}"
        )));
    }
    Ok(())
}
