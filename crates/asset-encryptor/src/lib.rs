//! Build-time encryption of a bundled image asset.
//!
//! The asset is encrypted with AES-256-CBC under a key derived from a
//! signature, a device id and a fixed salt, and written as `IV || ciphertext`
//! next to the original.

pub mod config;
pub mod crypto;
pub mod encryptor;
pub mod telemetry;
