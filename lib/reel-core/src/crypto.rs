//! AES-CBC key material for encrypted response bodies.
//!
//! Payloads are encrypted with AES in CBC mode and PKCS#5/PKCS#7 padding.
//! The key length picks the variant: 16 bytes for AES-128, 24 for AES-192,
//! 32 for AES-256. The IV is always one block (16 bytes).

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use derive_more::{Display, Error, From};

/// IV length, one AES block.
pub const IV_LEN: usize = 16;

/// Why a payload could not be decrypted.
#[derive(Debug, Display, Error, From)]
pub enum DecryptError {
    /// Key is not 16, 24 or 32 bytes long.
    #[display("invalid key length {_0}, expected 16, 24 or 32 bytes")]
    #[from(skip)]
    InvalidKeyLength(#[error(not(source))] usize),

    /// IV is not 16 bytes long.
    #[display("invalid IV length {_0}, expected 16 bytes")]
    #[from(skip)]
    InvalidIvLength(#[error(not(source))] usize),

    /// Ciphertext length or padding is wrong (usually the wrong key).
    #[display("ciphertext is not block aligned or its padding is invalid")]
    #[from(skip)]
    Unpad,

    /// Plaintext is not UTF-8.
    #[display("decrypted payload is not valid UTF-8")]
    #[from]
    Utf8(std::string::FromUtf8Error),

    /// The pipeline was built without key material.
    #[display("no decryption key configured")]
    #[from(skip)]
    MissingKey,
}

#[derive(Clone)]
enum CipherKey {
    Aes128([u8; 16]),
    Aes192([u8; 24]),
    Aes256([u8; 32]),
}

/// Symmetric key and IV used to decrypt response bodies.
///
/// Built once from configuration and shared read-only afterwards.
///
/// # Example
///
/// ```
/// use reel_core::KeyMaterial;
///
/// let keys = KeyMaterial::from_secrets("0123456789abcdef", "fedcba9876543210").expect("keys");
/// let ciphertext = keys.encrypt(br#"{"id":1}"#);
/// assert_eq!(keys.decrypt_utf8(&ciphertext).expect("plaintext"), r#"{"id":1}"#);
/// ```
#[derive(Clone)]
pub struct KeyMaterial {
    key: CipherKey,
    iv: [u8; IV_LEN],
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("bits", &self.key_bits())
            .finish_non_exhaustive()
    }
}

impl KeyMaterial {
    /// Create key material from raw key and IV bytes.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, DecryptError> {
        let key = if let Ok(key) = <[u8; 16]>::try_from(key) {
            CipherKey::Aes128(key)
        } else if let Ok(key) = <[u8; 24]>::try_from(key) {
            CipherKey::Aes192(key)
        } else if let Ok(key) = <[u8; 32]>::try_from(key) {
            CipherKey::Aes256(key)
        } else {
            return Err(DecryptError::InvalidKeyLength(key.len()));
        };
        let iv = <[u8; IV_LEN]>::try_from(iv).map_err(|_| DecryptError::InvalidIvLength(iv.len()))?;

        Ok(Self { key, iv })
    }

    /// Create key material from text secrets, using their UTF-8 bytes.
    pub fn from_secrets(key: &str, iv: &str) -> Result<Self, DecryptError> {
        Self::new(key.as_bytes(), iv.as_bytes())
    }

    /// AES key size in bits.
    #[must_use]
    pub const fn key_bits(&self) -> u16 {
        match self.key {
            CipherKey::Aes128(_) => 128,
            CipherKey::Aes192(_) => 192,
            CipherKey::Aes256(_) => 256,
        }
    }

    /// Decrypt and unpad `ciphertext`.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DecryptError> {
        let plaintext = match &self.key {
            CipherKey::Aes128(key) => cbc::Decryptor::<Aes128>::new(&(*key).into(), &self.iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            CipherKey::Aes192(key) => cbc::Decryptor::<Aes192>::new(&(*key).into(), &self.iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            CipherKey::Aes256(key) => cbc::Decryptor::<Aes256>::new(&(*key).into(), &self.iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        };
        plaintext.map_err(|_| DecryptError::Unpad)
    }

    /// Decrypt `ciphertext` and read it as UTF-8 text.
    pub fn decrypt_utf8(&self, ciphertext: &[u8]) -> Result<String, DecryptError> {
        let plaintext = self.decrypt(ciphertext)?;
        Ok(String::from_utf8(plaintext)?)
    }

    /// Pad and encrypt `plaintext`, the inverse of [`KeyMaterial::decrypt`].
    #[must_use]
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        match &self.key {
            CipherKey::Aes128(key) => cbc::Encryptor::<Aes128>::new(&(*key).into(), &self.iv.into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            CipherKey::Aes192(key) => cbc::Encryptor::<Aes192>::new(&(*key).into(), &self.iv.into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            CipherKey::Aes256(key) => cbc::Encryptor::<Aes256>::new(&(*key).into(), &self.iv.into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        }
    }
}
