use std::fmt;

use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

/// Size of an X25519 private key in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Size of an X25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Number of hash bytes that make up a key id
pub const KEY_ID_SIZE: usize = 8;

/// PEM tag for armored public keys
pub const PUBLIC_KEY_PEM_TAG: &str = "TRUSTVAULT PUBLIC KEY";
/// PEM tag for armored private keys
pub const PRIVATE_KEY_PEM_TAG: &str = "TRUSTVAULT PRIVATE KEY";

/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("key error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("expected a public key but found a private key")]
    UnexpectedPrivateKey,
}

/// Public half of a personal key pair
///
/// This is what gets copied into a contact's vault when a key is shared, and what
/// the encryption path reads. It never carries anything that would allow decryption.
///
/// # Examples
///
/// ```ignore
/// let secret_key = SecretKey::generate();
/// let public_key = secret_key.public();
///
/// let armored = public_key.to_armored("alice <alice@example.com>");
/// let (recovered, user_id) = PublicKey::from_armored(&armored)?;
/// assert_eq!(public_key, recovered);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(X25519PublicKey);

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.key_id()).finish()
    }
}

impl From<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        PublicKey(X25519PublicKey::from(bytes))
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(anyhow::anyhow!(
                "invalid public key size, expected {}, got {}",
                PUBLIC_KEY_SIZE,
                bytes.len()
            )
            .into());
        }
        let mut buff = [0; PUBLIC_KEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(buff.into())
    }
}

impl PublicKey {
    /// Convert public key to raw bytes
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        *self.0.as_bytes()
    }

    /// Short, stable identifier for this key
    ///
    /// Lowercase hex of the first [`KEY_ID_SIZE`] bytes of the BLAKE3 hash of the key.
    pub fn key_id(&self) -> String {
        let hash = blake3::hash(&self.to_bytes());
        hex::encode(&hash.as_bytes()[..KEY_ID_SIZE])
    }

    /// Encode in PEM with the owner's user id appended to the key bytes
    pub fn to_armored(&self, user_id: &str) -> String {
        armor(PUBLIC_KEY_PEM_TAG, &self.to_bytes(), user_id)
    }

    /// Parse an armored public key, returning the key and its embedded user id
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnexpectedPrivateKey`] if the armor holds a private key, and
    /// a generic error if the PEM is malformed, has an unknown tag, or is too short.
    pub fn from_armored(armored: &str) -> Result<(Self, String), KeyError> {
        let (tag, key_bytes, user_id) = dearmor(armored)?;
        match tag.as_str() {
            PUBLIC_KEY_PEM_TAG => Ok((PublicKey::from(key_bytes), user_id)),
            PRIVATE_KEY_PEM_TAG => Err(KeyError::UnexpectedPrivateKey),
            other => Err(anyhow::anyhow!("invalid PEM tag {other}, expected {PUBLIC_KEY_PEM_TAG}").into()),
        }
    }

    pub(crate) fn as_x25519(&self) -> &X25519PublicKey {
        &self.0
    }
}

/// Private half of a personal key pair
///
/// Only ever held by the vault that generated it. The `Debug` output is redacted.
#[derive(Clone)]
pub struct SecretKey(StaticSecret);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretKey")
            .field(&self.public().key_id())
            .finish()
    }
}

impl From<[u8; PRIVATE_KEY_SIZE]> for SecretKey {
    fn from(secret: [u8; PRIVATE_KEY_SIZE]) -> Self {
        Self(StaticSecret::from(secret))
    }
}

impl SecretKey {
    /// Generate a new random secret key using the operating system RNG
    pub fn generate() -> Result<Self, KeyError> {
        let mut bytes = [0u8; PRIVATE_KEY_SIZE];
        getrandom::getrandom(&mut bytes)
            .map_err(|e| anyhow::anyhow!("failed to generate random bytes: {}", e))?;
        Ok(Self::from(bytes))
    }

    /// Derive the public key from this secret key
    pub fn public(&self) -> PublicKey {
        PublicKey(X25519PublicKey::from(&self.0))
    }

    /// Convert secret key to raw bytes
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.0.to_bytes()
    }

    /// Encode in PEM with the owner's user id appended to the key bytes
    pub fn to_armored(&self, user_id: &str) -> String {
        armor(PRIVATE_KEY_PEM_TAG, &self.to_bytes(), user_id)
    }

    /// Parse an armored private key, returning the key and its embedded user id
    pub fn from_armored(armored: &str) -> Result<(Self, String), KeyError> {
        let (tag, key_bytes, user_id) = dearmor(armored)?;
        if tag != PRIVATE_KEY_PEM_TAG {
            return Err(
                anyhow::anyhow!("invalid PEM tag {tag}, expected {PRIVATE_KEY_PEM_TAG}").into(),
            );
        }
        Ok((SecretKey::from(key_bytes), user_id))
    }

    /// X25519 Diffie-Hellman with a peer public key
    pub(crate) fn diffie_hellman(&self, peer: &PublicKey) -> [u8; 32] {
        *self.0.diffie_hellman(peer.as_x25519()).as_bytes()
    }
}

fn armor(tag: &str, key_bytes: &[u8; 32], user_id: &str) -> String {
    let mut contents = Vec::with_capacity(key_bytes.len() + user_id.len());
    contents.extend_from_slice(key_bytes);
    contents.extend_from_slice(user_id.as_bytes());
    pem::encode(&pem::Pem::new(tag, contents))
}

fn dearmor(armored: &str) -> Result<(String, [u8; 32], String), KeyError> {
    let pem = pem::parse(armored.trim())
        .map_err(|e| anyhow::anyhow!("failed to parse PEM: {}", e))?;

    let contents = pem.contents();
    if contents.len() < PUBLIC_KEY_SIZE {
        return Err(anyhow::anyhow!(
            "armored key too short, expected at least {} bytes, got {}",
            PUBLIC_KEY_SIZE,
            contents.len()
        )
        .into());
    }

    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&contents[..PUBLIC_KEY_SIZE]);
    let user_id = String::from_utf8(contents[PUBLIC_KEY_SIZE..].to_vec())
        .map_err(|_| anyhow::anyhow!("armored user id is not valid utf-8"))?;

    Ok((pem.tag().to_string(), key_bytes, user_id))
}

#[cfg(test)]
mod test {
    use super::*;

    const ALICE: &str = "alice <alice@example.com>";

    #[test]
    fn test_keypair_generation() {
        let private_key = SecretKey::generate().unwrap();
        let public_key = private_key.public();

        let recovered_public = PublicKey::from(public_key.to_bytes());
        assert_eq!(public_key, recovered_public);

        let other = SecretKey::generate().unwrap();
        assert_ne!(public_key, other.public());
    }

    #[test]
    fn test_armored_public_key_carries_user_id() {
        let public_key = SecretKey::generate().unwrap().public();
        let armored = public_key.to_armored(ALICE);
        assert!(armored.contains(PUBLIC_KEY_PEM_TAG));

        let (recovered, user_id) = PublicKey::from_armored(&armored).unwrap();
        assert_eq!(recovered, public_key);
        assert_eq!(user_id, ALICE);
    }

    #[test]
    fn test_armored_private_key_is_not_a_public_key() {
        let private_key = SecretKey::generate().unwrap();
        let armored = private_key.to_armored(ALICE);

        let result = PublicKey::from_armored(&armored);
        assert!(matches!(result, Err(KeyError::UnexpectedPrivateKey)));

        let (recovered, _) = SecretKey::from_armored(&armored).unwrap();
        assert_eq!(recovered.to_bytes(), private_key.to_bytes());
        assert_eq!(recovered.public(), private_key.public());
    }

    #[test]
    fn test_garbage_armor_is_rejected() {
        assert!(PublicKey::from_armored("not a key").is_err());
        assert!(PublicKey::from_armored("").is_err());

        let short = pem::encode(&pem::Pem::new(PUBLIC_KEY_PEM_TAG, vec![1u8; 4]));
        assert!(PublicKey::from_armored(&short).is_err());

        let wrong_tag = pem::encode(&pem::Pem::new("CERTIFICATE", vec![1u8; 40]));
        assert!(PublicKey::from_armored(&wrong_tag).is_err());
        assert!(SecretKey::from_armored(&wrong_tag).is_err());
    }

    #[test]
    fn test_key_id_is_stable_and_short() {
        let public_key = SecretKey::generate().unwrap().public();
        let id = public_key.key_id();
        assert_eq!(id.len(), KEY_ID_SIZE * 2);
        assert_eq!(id, public_key.key_id());
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_secret_key_debug_is_redacted() {
        let private_key = SecretKey::generate().unwrap();
        let debug = format!("{:?}", private_key);
        assert!(!debug.contains(&hex::encode(private_key.to_bytes())));
        assert!(debug.contains(&private_key.public().key_id()));
    }
}
