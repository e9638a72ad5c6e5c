//! [`EncryptionReport`]: what a single encryption run produced.

use std::path::PathBuf;

use common::blob::IV_LEN;

/// Summary of one encrypted asset. Holds no key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub iv: [u8; IV_LEN],
    /// Bytes read from `input`.
    pub plaintext_len: usize,
    /// Bytes written to `output` (IV included).
    pub blob_len: usize,
}

impl EncryptionReport {
    /// IV as lowercase hex. The IV is public; it is stored in clear in the blob.
    pub fn iv_hex(&self) -> String {
        hex::encode(self.iv)
    }

    /// Bytes added by the IV and padding.
    pub fn overhead(&self) -> usize {
        self.blob_len - self.plaintext_len
    }
}
