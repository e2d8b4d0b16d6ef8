use common::crypto::CryptoError;

use crate::database::types::{ContactStatus, DUuid};

/// Every way a custody operation can be refused
///
/// `NotFound` is used both for "does not exist" and "exists but is not
/// visible to you", so callers cannot probe for other users' keys or
/// relationships.
#[derive(Debug, thiserror::Error)]
pub enum CustodyError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("a user cannot add themselves as a contact")]
    SelfReference,
    #[error("{}", duplicate_message(.0))]
    DuplicateRelation(ContactStatus),
    #[error("a user with that email already exists")]
    DuplicateUser,
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("users must be accepted contacts to exchange messages")]
    Forbidden,
    #[error("decryption failed: {0}")]
    Decryption(String),
    #[error("no vault exists for user {0}")]
    VaultNotFound(DUuid),
    #[error("cryptographic operation failed: {0}")]
    Crypto(#[from] CryptoError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn duplicate_message(status: &ContactStatus) -> &'static str {
    match status {
        ContactStatus::Pending => "a contact request between these users is already pending",
        ContactStatus::Accepted => "these users are already contacts",
    }
}
