//! File-level encryption: read the asset, encrypt it, write `IV || ciphertext`.
//!
//! # Run sequence
//!
//! 1. Resolve input and output paths from [`Config`].
//! 2. Stop with [`EncryptorError::MissingInputFile`] if the input is absent.
//!    Nothing is written in that case.
//! 3. Derive the key from the configured signature and device id.
//! 4. Read the plaintext, encrypt under a fresh IV, write the blob.
//! 5. Optionally decrypt the written file and compare it with the input.
//!
//! Any failure ends the run. The output is not written atomically: an
//! interrupted write can leave a truncated file behind.

pub mod report;

pub use report::EncryptionReport;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use common::{EncryptedBlob, EncryptorError};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::crypto::{cipher, derive_key, KeyMaterial};

/// Encrypt `input` under `key` and write the blob to `output`.
///
/// The input is read in full and closed before the output is created. The
/// output is created or truncated, written once, flushed and synced.
///
/// # Errors
///
/// Returns [`EncryptorError::MissingInputFile`] if `input` does not exist and
/// [`EncryptorError::Io`] if it cannot be read or `output` cannot be written.
pub fn encrypt_file(
    input: &Path,
    output: &Path,
    key: &KeyMaterial,
) -> Result<EncryptionReport, EncryptorError> {
    let plaintext = read_input(input)?;
    debug!(path = %input.display(), bytes = plaintext.len(), "read plaintext");

    let blob = cipher::encrypt(&plaintext, key)?;
    let bytes = blob.to_bytes();
    write_output(output, &bytes)?;
    debug!(path = %output.display(), bytes = bytes.len(), "wrote encrypted blob");

    Ok(EncryptionReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        iv: blob.iv,
        plaintext_len: plaintext.len(),
        blob_len: bytes.len(),
    })
}

/// Read an `IV || ciphertext` file and decrypt it.
///
/// # Errors
///
/// Returns [`EncryptorError::MissingInputFile`] / [`EncryptorError::Io`] on
/// read failure, [`EncryptorError::InvalidBlob`] if the layout is wrong and
/// [`EncryptorError::Cipher`] if decryption fails.
pub fn decrypt_file(input: &Path, key: &KeyMaterial) -> Result<Vec<u8>, EncryptorError> {
    let raw = read_input(input)?;
    let blob = EncryptedBlob::from_bytes(&raw)?;
    Ok(cipher::decrypt(&blob, key)?)
}

/// Check that `report.output` decrypts back to the current contents of `report.input`.
pub fn verify_output(report: &EncryptionReport, key: &KeyMaterial) -> Result<(), EncryptorError> {
    let expected = read_input(&report.input)?;
    let actual = decrypt_file(&report.output, key)?;
    if actual != expected {
        return Err(EncryptorError::Verification(format!(
            "{} does not decrypt to {} ({} vs {} bytes)",
            report.output.display(),
            report.input.display(),
            actual.len(),
            expected.len()
        )));
    }
    Ok(())
}

/// Run the full encryption sequence described in the module docs.
pub fn run(cfg: &Config) -> Result<EncryptionReport, EncryptorError> {
    let input = cfg.input_path();
    let output = cfg.output_path();

    if !input.exists() {
        return Err(EncryptorError::MissingInputFile(input));
    }

    let key = derive_key(&cfg.signature, &cfg.device_id);

    info!(input = %input.display(), output = %output.display(), "encrypting asset");
    let report = encrypt_file(&input, &output, &key)?;

    if cfg.verify_output {
        verify_output(&report, &key)?;
        info!(path = %report.output.display(), "output verified");
    }

    info!(
        iv = %report.iv_hex(),
        plaintext_bytes = report.plaintext_len,
        encrypted_bytes = report.blob_len,
        overhead_bytes = report.overhead(),
        "asset encrypted"
    );
    warn!(
        original = %report.input.display(),
        "plaintext original is not deleted; remove it so only the .enc file ships"
    );

    Ok(report)
}

fn read_input(path: &Path) -> Result<Vec<u8>, EncryptorError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => EncryptorError::MissingInputFile(path.to_path_buf()),
        _ => EncryptorError::io(path, e),
    })
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), EncryptorError> {
    let mut file = File::create(path).map_err(|e| EncryptorError::io(path, e))?;
    file.write_all(bytes)
        .and_then(|()| file.flush())
        .and_then(|()| file.sync_all())
        .map_err(|e| EncryptorError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::blob::blob_len;
    use common::ExitPolicy;
    use tempfile::TempDir;

    fn project_with_asset(contents: &[u8]) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            project_root: dir.path().to_path_buf(),
            ..Config::default()
        };
        fs::create_dir_all(dir.path().join(&cfg.assets_dir)).unwrap();
        fs::write(cfg.input_path(), contents).unwrap();
        (dir, cfg)
    }

    #[test]
    fn encrypt_then_decrypt_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("template.png");
        let output = dir.path().join("template.png.enc");
        let plaintext: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        fs::write(&input, &plaintext).unwrap();

        let key = derive_key("sig", "dev");
        let report = encrypt_file(&input, &output, &key).unwrap();

        assert_eq!(report.plaintext_len, 5000);
        assert_eq!(report.blob_len, blob_len(5000));
        assert_eq!(fs::metadata(&output).unwrap().len() as usize, report.blob_len);
        assert_eq!(&fs::read(&output).unwrap()[..16], &report.iv);
        assert_eq!(decrypt_file(&output, &key).unwrap(), plaintext);
    }

    #[test]
    fn hello_world_blob_is_32_bytes() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("hello.txt");
        let output = dir.path().join("hello.txt.enc");
        fs::write(&input, b"hello world").unwrap();

        let key = derive_key("sig", "dev");
        encrypt_file(&input, &output, &key).unwrap();

        assert_eq!(fs::read(&output).unwrap().len(), 32);
        assert_eq!(decrypt_file(&output, &key).unwrap(), b"hello world");
    }

    #[test]
    fn empty_input_still_produces_one_block() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty");
        let output = dir.path().join("empty.enc");
        fs::write(&input, b"").unwrap();

        let key = derive_key("sig", "dev");
        let report = encrypt_file(&input, &output, &key).unwrap();
        assert_eq!(report.blob_len, 32);
        assert!(decrypt_file(&output, &key).unwrap().is_empty());
    }

    #[test]
    fn existing_output_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("a.png");
        let output = dir.path().join("a.png.enc");
        fs::write(&input, b"abc").unwrap();
        fs::write(&output, vec![0u8; 4096]).unwrap();

        let key = derive_key("sig", "dev");
        encrypt_file(&input, &output, &key).unwrap();
        assert_eq!(fs::read(&output).unwrap().len(), 32);
    }

    #[test]
    fn unwritable_output_is_io_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("a.png");
        fs::write(&input, b"abc").unwrap();
        let output = dir.path().join("no-such-dir").join("a.png.enc");

        let err = encrypt_file(&input, &output, &derive_key("sig", "dev")).unwrap_err();
        assert!(matches!(err, EncryptorError::Io { .. }));
        assert_eq!(err.exit_code(ExitPolicy::FailOpen), 0);
        assert_eq!(err.exit_code(ExitPolicy::Strict), 1);
    }

    #[test]
    fn decrypt_file_rejects_truncated_blob() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.enc");
        fs::write(&path, [0u8; 20]).unwrap();

        let err = decrypt_file(&path, &derive_key("sig", "dev")).unwrap_err();
        assert!(matches!(err, EncryptorError::InvalidBlob(_)));
    }

    #[test]
    fn run_writes_output_next_to_asset() {
        let (_dir, cfg) = project_with_asset(b"\x89PNG fake image bytes");
        let report = run(&cfg).unwrap();

        assert_eq!(report.output, cfg.output_path());
        assert!(cfg.input_path().exists(), "original must be left in place");

        let key = derive_key(&cfg.signature, &cfg.device_id);
        assert_eq!(
            decrypt_file(&cfg.output_path(), &key).unwrap(),
            b"\x89PNG fake image bytes"
        );
    }

    #[test]
    fn run_with_verification() {
        let (_dir, mut cfg) = project_with_asset(b"verify me");
        cfg.verify_output = true;
        assert!(run(&cfg).is_ok());
    }

    #[test]
    fn run_twice_gives_different_blobs() {
        let (_dir, cfg) = project_with_asset(b"same plaintext");
        run(&cfg).unwrap();
        let first = fs::read(cfg.output_path()).unwrap();
        run(&cfg).unwrap();
        let second = fs::read(cfg.output_path()).unwrap();

        assert_ne!(first, second);
        let key = derive_key(&cfg.signature, &cfg.device_id);
        assert_eq!(decrypt_file(&cfg.output_path(), &key).unwrap(), b"same plaintext");
    }

    #[test]
    fn run_with_missing_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            project_root: dir.path().to_path_buf(),
            ..Config::default()
        };

        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, EncryptorError::MissingInputFile(_)));
        assert_eq!(err.exit_code(cfg.exit_policy()), 1);
        assert!(!cfg.output_path().exists());
    }

    #[test]
    fn verify_output_detects_changed_input() {
        let (_dir, cfg) = project_with_asset(b"original");
        let report = run(&cfg).unwrap();
        fs::write(cfg.input_path(), b"edited afterwards").unwrap();

        let key = derive_key(&cfg.signature, &cfg.device_id);
        let err = verify_output(&report, &key).unwrap_err();
        assert!(matches!(err, EncryptorError::Verification(_)));
    }
}
