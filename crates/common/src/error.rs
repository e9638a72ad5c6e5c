//! Common error type shared across crates.

use std::path::PathBuf;

use thiserror::Error;

/// How failures translate into a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Only a missing input file exits non-zero; every other failure is
    /// logged and exits 0 so the surrounding build keeps going.
    #[default]
    FailOpen,
    /// Every failure exits non-zero.
    Strict,
}

/// Top-level encryptor error type.
///
/// Variants map to process exit codes via [`EncryptorError::exit_code`]:
/// - [`EncryptorError::MissingInputFile`] → 1 under every policy
/// - everything else → 0 under [`ExitPolicy::FailOpen`], 1 under [`ExitPolicy::Strict`]
#[derive(Debug, Error)]
pub enum EncryptorError {
    /// The plaintext asset does not exist. Nothing has been written.
    #[error("input file not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    /// Reading the input or writing the output failed.
    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes handed to the decrypt side do not follow the `IV || ciphertext` layout.
    #[error("invalid encrypted blob: {0}")]
    InvalidBlob(String),

    /// The block cipher rejected the key, IV or padding.
    #[error("cipher failure: {0}")]
    Cipher(String),

    /// The written output did not decrypt back to the original plaintext.
    #[error("verification failed: {0}")]
    Verification(String),

    /// A configuration value is missing or out of range.
    #[error("configuration invalid: {0}")]
    Config(String),
}

impl EncryptorError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EncryptorError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the process exit code that should be reported for this error.
    pub fn exit_code(&self, policy: ExitPolicy) -> u8 {
        match (self, policy) {
            (EncryptorError::MissingInputFile(_), _) => 1,
            (_, ExitPolicy::Strict) => 1,
            (_, ExitPolicy::FailOpen) => 0,
        }
    }
}
