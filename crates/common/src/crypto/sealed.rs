//! Sealed-box message encryption
//!
//! A sealed message can be produced by anyone holding the recipient's public key and
//! opened only by the holder of the matching private key.
//!
//! # Wire Format
//!
//! ```text
//! [ ephemeral_pubkey: 32 bytes ][ nonce: 12 bytes ][ ciphertext || tag: n + 16 bytes ]
//! ```
//!
//! The ChaCha20-Poly1305 key is `BLAKE3-derive_key(SEAL_CONTEXT, shared || ephemeral || recipient)`,
//! binding the key to both public halves so a ciphertext cannot be replayed against a
//! different recipient.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};

use super::keys::{KeyError, PublicKey, SecretKey, PUBLIC_KEY_SIZE};

/// PEM tag for armored sealed messages
pub const MESSAGE_PEM_TAG: &str = "TRUSTVAULT MESSAGE";
/// Size of ChaCha20-Poly1305 nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of the Poly1305 authentication tag in bytes
pub const TAG_SIZE: usize = 16;

const SEAL_CONTEXT: &str = "trustvault 2024-06 sealed message v1";
const HEADER_SIZE: usize = PUBLIC_KEY_SIZE + NONCE_SIZE;

/// Errors that can occur while sealing or opening a message
#[derive(Debug, thiserror::Error)]
pub enum SealError {
    #[error("seal error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("key error: {0}")]
    Key(#[from] KeyError),
}

/// A message encrypted for exactly one recipient public key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedMessage(Vec<u8>);

impl SealedMessage {
    /// Encrypt `plaintext` for `recipient`
    ///
    /// A fresh ephemeral key and nonce are generated on every call, so sealing the same
    /// plaintext twice yields different ciphertexts.
    pub fn seal(plaintext: &[u8], recipient: &PublicKey) -> Result<Self, SealError> {
        let ephemeral_secret = SecretKey::generate()?;
        let ephemeral_public = ephemeral_secret.public();

        let shared = ephemeral_secret.diffie_hellman(recipient);
        let cipher = message_cipher(&shared, &ephemeral_public, recipient);

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes)
            .map_err(|e| anyhow::anyhow!("failed to generate nonce: {}", e))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| anyhow::anyhow!("encrypt error"))?;

        let mut out = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
        out.extend_from_slice(&ephemeral_public.to_bytes());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);

        Ok(Self(out))
    }

    /// Decrypt with the recipient's private key
    ///
    /// # Errors
    ///
    /// Fails if the data is truncated, was sealed for a different key, or was tampered with.
    pub fn open(&self, recipient_secret: &SecretKey) -> Result<Vec<u8>, SealError> {
        if self.0.len() < HEADER_SIZE + TAG_SIZE {
            return Err(anyhow::anyhow!("sealed message too short").into());
        }

        let ephemeral_public = PublicKey::try_from(&self.0[..PUBLIC_KEY_SIZE])?;
        let nonce = Nonce::from_slice(&self.0[PUBLIC_KEY_SIZE..HEADER_SIZE]);

        let shared = recipient_secret.diffie_hellman(&ephemeral_public);
        let cipher = message_cipher(&shared, &ephemeral_public, &recipient_secret.public());

        let plaintext = cipher
            .decrypt(nonce, &self.0[HEADER_SIZE..])
            .map_err(|_| anyhow::anyhow!("decrypt error"))?;

        Ok(plaintext)
    }

    /// Encode in PEM for storage in a text column or a JSON body
    pub fn to_armored(&self) -> String {
        pem::encode(&pem::Pem::new(MESSAGE_PEM_TAG, self.0.clone()))
    }

    /// Parse an armored sealed message
    pub fn from_armored(armored: &str) -> Result<Self, SealError> {
        let pem = pem::parse(armored.trim())
            .map_err(|e| anyhow::anyhow!("failed to parse PEM: {}", e))?;
        if pem.tag() != MESSAGE_PEM_TAG {
            return Err(anyhow::anyhow!("invalid PEM tag, expected {MESSAGE_PEM_TAG}").into());
        }
        Ok(Self(pem.into_contents()))
    }
}

fn message_cipher(
    shared: &[u8; 32],
    ephemeral: &PublicKey,
    recipient: &PublicKey,
) -> ChaCha20Poly1305 {
    let mut material = Vec::with_capacity(3 * PUBLIC_KEY_SIZE);
    material.extend_from_slice(shared);
    material.extend_from_slice(&ephemeral.to_bytes());
    material.extend_from_slice(&recipient.to_bytes());

    let key = blake3::derive_key(SEAL_CONTEXT, &material);
    ChaCha20Poly1305::new(Key::from_slice(&key))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_seal_open() {
        let recipient = SecretKey::generate().unwrap();
        let data = b"hello world, this is a test message for sealing";

        let sealed = SealedMessage::seal(data, &recipient.public()).unwrap();
        let opened = sealed.open(&recipient).unwrap();

        assert_eq!(data.as_slice(), opened.as_slice());
    }

    #[test]
    fn test_wrong_recipient_cannot_open() {
        let alice = SecretKey::generate().unwrap();
        let bob = SecretKey::generate().unwrap();

        let sealed = SealedMessage::seal(b"for alice only", &alice.public()).unwrap();
        assert!(sealed.open(&bob).is_err());
        assert!(sealed.open(&alice).is_ok());
    }

    #[test]
    fn test_sealing_is_randomized() {
        let recipient = SecretKey::generate().unwrap();
        let a = SealedMessage::seal(b"same", &recipient.public()).unwrap();
        let b = SealedMessage::seal(b"same", &recipient.public()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tampering_is_detected() {
        let recipient = SecretKey::generate().unwrap();
        let sealed = SealedMessage::seal(b"integrity", &recipient.public()).unwrap();

        let mut bytes = sealed.0.clone();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(SealedMessage(bytes).open(&recipient).is_err());

        let truncated = SealedMessage(sealed.0[..HEADER_SIZE].to_vec());
        assert!(truncated.open(&recipient).is_err());
    }

    #[test]
    fn test_armor_roundtrip_and_empty_plaintext() {
        let recipient = SecretKey::generate().unwrap();
        let sealed = SealedMessage::seal(b"", &recipient.public()).unwrap();

        let armored = sealed.to_armored();
        assert!(armored.contains(MESSAGE_PEM_TAG));

        let parsed = SealedMessage::from_armored(&armored).unwrap();
        assert_eq!(parsed, sealed);
        assert!(parsed.open(&recipient).unwrap().is_empty());
    }

    #[test]
    fn test_armored_key_is_not_a_message() {
        let key = SecretKey::generate().unwrap();
        let armored = key.public().to_armored("bob <bob@example.com>");
        assert!(SealedMessage::from_armored(&armored).is_err());
    }
}
