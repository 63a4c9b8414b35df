//! Password storage.
//!
//! Two storage schemes are supported:
//! * [`PasswordScheme::Reversible`] encrypts the password with AES-256-GCM under a key derived from
//!   `SHOP_PASSWORD_SECRET`. The stored blob is `base64(nonce || ciphertext)`. Anyone holding the secret can recover
//!   every password, so this scheme should only be used where compatibility with existing data demands it.
//! * [`PasswordScheme::Argon2`] stores a salted Argon2id hash in PHC format.
//!
//! [`CredentialCodec::matches`] recognises both formats, so a deployment can switch schemes without locking out
//! existing accounts. Any failure to decrypt or verify is reported as a mismatch.
use std::{fmt::Display, str::FromStr};

use aes_gcm::{
    aead::{Aead, AeadCore, OsRng},
    Aes256Gcm,
    KeyInit,
    Nonce,
};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::*;
use sha2::{Digest, Sha256};
use shop_common::Secret;
use thiserror::Error;

const NONCE_LENGTH: usize = 12;
const ARGON2_PREFIX: &str = "$argon2";

#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Encryption failed. {0}")]
    EncryptionFailed(String),
    #[error("Decryption failed. {0}")]
    DecryptionFailed(String),
    #[error("Password hashing failed. {0}")]
    HashingFailed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    #[default]
    Reversible,
    Argon2,
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reversible" | "aes" => Ok(Self::Reversible),
            "argon2" | "hash" => Ok(Self::Argon2),
            _ => Err(format!("'{s}' is not a password scheme. Use 'reversible' or 'argon2'")),
        }
    }
}

impl Display for PasswordScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reversible => write!(f, "reversible"),
            Self::Argon2 => write!(f, "argon2"),
        }
    }
}

fn cipher_for(secret: &str) -> Result<Aes256Gcm, String> {
    let key = Sha256::digest(secret.as_bytes());
    Aes256Gcm::new_from_slice(key.as_slice()).map_err(|e| e.to_string())
}

/// Encrypts `plaintext` under `secret`. Every call uses a fresh nonce, so encrypting the same password twice yields
/// different blobs.
pub fn encrypt(plaintext: &str, secret: &str) -> Result<String, CredentialError> {
    let cipher = cipher_for(secret).map_err(CredentialError::EncryptionFailed)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext =
        cipher.encrypt(&nonce, plaintext.as_bytes()).map_err(|e| CredentialError::EncryptionFailed(e.to_string()))?;
    let mut blob = nonce.to_vec();
    blob.extend_from_slice(&ciphertext);
    Ok(base64::encode(blob))
}

/// Recovers the plaintext from a blob produced by [`encrypt`]. Fails if the blob is malformed or `secret` is not the
/// one it was encrypted with.
pub fn decrypt(blob: &str, secret: &str) -> Result<String, CredentialError> {
    let bytes = base64::decode(blob).map_err(|e| CredentialError::DecryptionFailed(e.to_string()))?;
    if bytes.len() <= NONCE_LENGTH {
        return Err(CredentialError::DecryptionFailed("Ciphertext is too short".to_string()));
    }
    let (nonce, ciphertext) = bytes.split_at(NONCE_LENGTH);
    let cipher = cipher_for(secret).map_err(CredentialError::DecryptionFailed)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CredentialError::DecryptionFailed("Authentication tag mismatch".to_string()))?;
    String::from_utf8(plaintext).map_err(|e| CredentialError::DecryptionFailed(e.to_string()))
}

#[derive(Clone, Debug)]
pub struct CredentialCodec {
    secret: Secret<String>,
    scheme: PasswordScheme,
}

impl CredentialCodec {
    pub fn new(secret: Secret<String>, scheme: PasswordScheme) -> Self {
        Self { secret, scheme }
    }

    /// Produces the blob to store for `plaintext` under the configured scheme.
    pub fn seal(&self, plaintext: &str) -> Result<String, CredentialError> {
        match self.scheme {
            PasswordScheme::Reversible => encrypt(plaintext, self.secret.reveal()),
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(plaintext.as_bytes(), &salt)
                    .map_err(|e| CredentialError::HashingFailed(e.to_string()))?;
                Ok(hash.to_string())
            },
        }
    }

    /// Checks a submitted password against a stored blob of either scheme.
    pub fn matches(&self, stored: &str, submitted: &str) -> bool {
        if stored.starts_with(ARGON2_PREFIX) {
            return match PasswordHash::new(stored) {
                Ok(hash) => Argon2::default().verify_password(submitted.as_bytes(), &hash).is_ok(),
                Err(e) => {
                    warn!("🔐️ Stored password hash is malformed. {e}");
                    false
                },
            };
        }
        match decrypt(stored, self.secret.reveal()) {
            Ok(plaintext) => plaintext == submitted,
            Err(e) => {
                debug!("🔐️ Stored password could not be decrypted. {e}");
                false
            },
        }
    }
}
