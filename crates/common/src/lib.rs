//! Types shared across `asset-encryptor` crates: the error type and the
//! `IV || ciphertext` blob layout.

pub mod blob;
pub mod error;

pub use blob::EncryptedBlob;
pub use error::{EncryptorError, ExitPolicy};
