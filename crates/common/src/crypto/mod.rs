//! Cryptographic primitives for TrustVault
//!
//! This module is the only place in the workspace that touches key material as bytes.
//! Everything above it (the key custody core, the HTTP API) deals in armored strings
//! and goes through the [`CryptoProvider`] trait.
//!
//! # Security Model
//!
//! ## Key Pairs
//! A personal key is an X25519 static key pair. Both halves are armored in PEM, with the
//! owner's user id (`name <email>`) embedded after the raw key bytes so that an imported
//! public key can be described without any database lookup.
//!
//! ## Message Encryption
//! Messages are sealed for a single recipient public key:
//! 1. Generate an ephemeral X25519 key pair
//! 2. Perform ECDH between the ephemeral secret and the recipient's public key
//! 3. Derive a ChaCha20-Poly1305 key with BLAKE3 over `shared || ephemeral || recipient`
//! 4. Encrypt with a random nonce and package `ephemeral || nonce || ciphertext`
//!
//! Only the holder of the recipient's private key can recompute the shared secret.
//!
//! ## Key Ids
//! A key id is the lowercase hex of the first 8 bytes of the BLAKE3 hash of the public key.
//! It is stable for the lifetime of a key and is recorded next to every message as a
//! version hint.

mod keys;
mod provider;
mod sealed;

pub use keys::{
    KeyError, PublicKey, SecretKey, KEY_ID_SIZE, PRIVATE_KEY_PEM_TAG, PRIVATE_KEY_SIZE,
    PUBLIC_KEY_PEM_TAG, PUBLIC_KEY_SIZE,
};
pub use provider::{
    ArmoredKeyPair, CryptoError, CryptoProvider, KeyInfo, SealedBoxProvider, KEY_ALGORITHM,
};
pub use sealed::{SealError, SealedMessage, MESSAGE_PEM_TAG};
