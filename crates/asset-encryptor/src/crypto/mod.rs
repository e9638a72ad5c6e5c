//! AES-256-CBC asset encryption primitives.
//!
//! This module is free of filesystem access. It derives the key and turns
//! plaintext bytes into an [`common::EncryptedBlob`] and back.
//!
//! # Blob format
//!
//! ```text
//! IV (16 bytes) || AES-256-CBC(PKCS#7(plaintext))
//! ```

pub mod cipher;
pub mod kdf;

pub use kdf::{derive_key, KeyMaterial, DEFAULT_DEVICE_ID, KEY_LEN, SIGNATURE_PLACEHOLDER};
