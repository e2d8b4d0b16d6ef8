use serde::{Deserialize, Serialize};

use super::keys::{KeyError, PublicKey, SecretKey};
use super::sealed::SealedMessage;

/// Algorithm reported by [`SealedBoxProvider::key_info`]
pub const KEY_ALGORITHM: &str = "x25519-blake3-chacha20poly1305";

/// A freshly generated key pair, both halves armored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmoredKeyPair {
    pub public_key: String,
    pub private_key: String,
}

/// Description of an armored key, as shown to a user before importing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    pub valid: bool,
    pub user_ids: Vec<String>,
    pub key_id: Option<String>,
    pub algorithm: Option<String>,
}

impl KeyInfo {
    fn invalid() -> Self {
        Self {
            valid: false,
            user_ids: Vec::new(),
            key_id: None,
            algorithm: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("encryption failed: {0}")]
    Encryption(String),
    #[error("decryption failed: {0}")]
    Decryption(String),
}

/// The cryptographic collaborator used by the key custody core
///
/// Every call is a single blocking operation. Failures are reported immediately and are
/// never retried by callers.
pub trait CryptoProvider: Send + Sync {
    /// Generate a key pair bound to `name <email>`
    fn generate_key_pair(&self, name: &str, email: &str) -> Result<ArmoredKeyPair, CryptoError>;

    /// Read and validate an armored public key
    ///
    /// Armored private keys are rejected: importing one must never be mistaken for
    /// importing a contact's public key.
    fn read_public_key(&self, armored: &str) -> Result<PublicKey, CryptoError>;

    /// Read an armored private key
    fn read_private_key(&self, armored: &str) -> Result<SecretKey, CryptoError>;

    /// Encrypt `plaintext` for the holder of `key`, returning armored ciphertext
    fn encrypt(&self, plaintext: &str, key: &PublicKey) -> Result<String, CryptoError>;

    /// Decrypt armored ciphertext with `key`
    fn decrypt(&self, ciphertext: &str, key: &SecretKey) -> Result<String, CryptoError>;

    /// Describe an armored key without failing
    fn key_info(&self, armored: &str) -> KeyInfo;
}

/// [`CryptoProvider`] backed by X25519 sealed boxes
#[derive(Debug, Clone, Copy, Default)]
pub struct SealedBoxProvider;

impl CryptoProvider for SealedBoxProvider {
    fn generate_key_pair(&self, name: &str, email: &str) -> Result<ArmoredKeyPair, CryptoError> {
        let user_id = format!("{} <{}>", name, email);
        let secret = SecretKey::generate().map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        tracing::debug!(key_id = %secret.public().key_id(), "generated key pair");

        Ok(ArmoredKeyPair {
            public_key: secret.public().to_armored(&user_id),
            private_key: secret.to_armored(&user_id),
        })
    }

    fn read_public_key(&self, armored: &str) -> Result<PublicKey, CryptoError> {
        match PublicKey::from_armored(armored) {
            Ok((key, _)) => Ok(key),
            Err(KeyError::UnexpectedPrivateKey) => Err(CryptoError::InvalidKey(
                "a private key was supplied where a public key is required".into(),
            )),
            Err(e) => Err(CryptoError::InvalidKey(e.to_string())),
        }
    }

    fn read_private_key(&self, armored: &str) -> Result<SecretKey, CryptoError> {
        SecretKey::from_armored(armored)
            .map(|(key, _)| key)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))
    }

    fn encrypt(&self, plaintext: &str, key: &PublicKey) -> Result<String, CryptoError> {
        let sealed = SealedMessage::seal(plaintext.as_bytes(), key)
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;
        Ok(sealed.to_armored())
    }

    fn decrypt(&self, ciphertext: &str, key: &SecretKey) -> Result<String, CryptoError> {
        let sealed = SealedMessage::from_armored(ciphertext)
            .map_err(|e| CryptoError::Decryption(e.to_string()))?;
        let plaintext = sealed
            .open(key)
            .map_err(|e| CryptoError::Decryption(e.to_string()))?;
        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid utf-8".into()))
    }

    fn key_info(&self, armored: &str) -> KeyInfo {
        let parsed = PublicKey::from_armored(armored).or_else(|e| match e {
            KeyError::UnexpectedPrivateKey => {
                SecretKey::from_armored(armored).map(|(secret, uid)| (secret.public(), uid))
            }
            other => Err(other),
        });

        match parsed {
            Ok((key, user_id)) => KeyInfo {
                valid: true,
                user_ids: if user_id.is_empty() {
                    Vec::new()
                } else {
                    vec![user_id]
                },
                key_id: Some(key.key_id()),
                algorithm: Some(KEY_ALGORITHM.to_string()),
            },
            Err(_) => KeyInfo::invalid(),
        }
    }
}
