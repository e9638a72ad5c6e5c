//! AES-256-CBC encryption and decryption of whole assets.
//!
//! PKCS#7 padding, random 128-bit IV per call. There is no authentication
//! tag: a wrong key or tampered ciphertext usually surfaces as a padding
//! error, but may also decrypt to garbage.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use common::blob::IV_LEN;
use common::{EncryptedBlob, EncryptorError};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

use super::KeyMaterial;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Key or IV has the wrong length for AES-256-CBC.
    #[error("invalid key or IV length")]
    InvalidLength,

    /// The decrypted plaintext does not end in valid PKCS#7 padding.
    #[error("invalid padding (wrong key or corrupted ciphertext)")]
    BadPadding,
}

impl From<CipherError> for EncryptorError {
    fn from(e: CipherError) -> Self {
        EncryptorError::Cipher(e.to_string())
    }
}

/// Fresh IV from the OS CSPRNG.
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypt `plaintext` under `key` with a freshly generated IV.
///
/// # Errors
///
/// Returns [`CipherError::InvalidLength`] if the cipher rejects the key or IV,
/// which cannot happen for a [`KeyMaterial`].
pub fn encrypt(plaintext: &[u8], key: &KeyMaterial) -> Result<EncryptedBlob, CipherError> {
    encrypt_with_iv(plaintext, key, generate_iv())
}

/// Encrypt with a caller-supplied IV. Only for fixed test vectors; production
/// paths go through [`encrypt`].
pub fn encrypt_with_iv(
    plaintext: &[u8],
    key: &KeyMaterial,
    iv: [u8; IV_LEN],
) -> Result<EncryptedBlob, CipherError> {
    let ciphertext = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|_| CipherError::InvalidLength)?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    Ok(EncryptedBlob { iv, ciphertext })
}

/// Decrypt a blob back to plaintext bytes.
///
/// # Errors
///
/// Returns [`CipherError::BadPadding`] if the padding does not check out,
/// usually because the key is wrong or the ciphertext was modified.
pub fn decrypt(blob: &EncryptedBlob, key: &KeyMaterial) -> Result<Vec<u8>, CipherError> {
    Aes256CbcDec::new_from_slices(key.as_bytes(), &blob.iv)
        .map_err(|_| CipherError::InvalidLength)?
        .decrypt_padded_vec_mut::<Pkcs7>(&blob.ciphertext)
        .map_err(|_| CipherError::BadPadding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_key, DEFAULT_DEVICE_ID, SIGNATURE_PLACEHOLDER};
    use common::blob::blob_len;

    fn random_key() -> KeyMaterial {
        let mut key = [0u8; crate::crypto::KEY_LEN];
        OsRng.fill_bytes(&mut key);
        KeyMaterial::from(key)
    }

    #[test]
    fn hello_world_fits_one_block() {
        let key = random_key();
        let blob = encrypt(b"hello world", &key).unwrap();
        assert_eq!(blob.ciphertext.len(), 16);
        assert_eq!(blob.to_bytes().len(), 32);

        let parsed = EncryptedBlob::from_bytes(&blob.to_bytes()).unwrap();
        assert_eq!(decrypt(&parsed, &key).unwrap(), b"hello world");
    }

    #[test]
    fn known_answer_with_fixed_iv() {
        let key = derive_key(SIGNATURE_PLACEHOLDER, DEFAULT_DEVICE_ID);
        let iv: [u8; IV_LEN] = core::array::from_fn(|i| i as u8);
        let blob = encrypt_with_iv(b"hello world", &key, iv).unwrap();
        assert_eq!(hex::encode(&blob.ciphertext), "ebc1e220bf0a344d4e486825a2c8dc41");
        assert_eq!(blob.iv, iv);
    }

    #[test]
    fn round_trip_across_lengths() {
        let key = random_key();
        for len in [0usize, 1, 15, 16, 17, 31, 32, 33, 1000, 4096] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();
            let blob = encrypt(&plaintext, &key).unwrap();
            assert_eq!(blob.len(), blob_len(len), "len {len}");
            assert_eq!(decrypt(&blob, &key).unwrap(), plaintext, "len {len}");
        }
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let key = random_key();
        let a = encrypt(b"same bytes", &key).unwrap();
        let b = encrypt(b"same bytes", &key).unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
        assert_eq!(decrypt(&a, &key).unwrap(), b"same bytes");
        assert_eq!(decrypt(&b, &key).unwrap(), b"same bytes");
    }

    #[test]
    fn wrong_key_does_not_recover_plaintext() {
        let blob = encrypt(b"secret template", &random_key()).unwrap();
        match decrypt(&blob, &random_key()) {
            Ok(p) => assert_ne!(p, b"secret template"),
            Err(e) => assert!(matches!(e, CipherError::BadPadding)),
        }
    }

    #[test]
    fn cipher_error_converts_to_encryptor_error() {
        let e: EncryptorError = CipherError::BadPadding.into();
        assert!(matches!(e, EncryptorError::Cipher(_)));
        assert!(e.to_string().contains("invalid padding"));
    }
}
