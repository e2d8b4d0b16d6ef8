use common::crypto::CryptoProvider;

use crate::database::models::{KeyRecord, KeySnapshot, Message, User};
use crate::database::types::DUuid;
use crate::database::Database;

use super::contacts::require_accepted;
use super::{cipher, CustodyError};

/// Both checks every message operation runs before touching content: the
///  receiver exists, and the two users are accepted contacts
async fn gate(db: &Database, sender: DUuid, receiver: DUuid) -> Result<(), CustodyError> {
    if User::get(receiver, db).await?.is_none() {
        return Err(CustodyError::NotFound("user"));
    }
    require_accepted(db, sender, receiver).await?;
    Ok(())
}

/// Store caller-supplied content as is. Whether it was encrypted is the
///  caller's business; `key_id` is recorded alongside it.
pub async fn send_message(
    db: &Database,
    crypto: &dyn CryptoProvider,
    sender: DUuid,
    receiver: DUuid,
    content: &str,
    key_id: DUuid,
) -> Result<Message, CustodyError> {
    gate(db, sender, receiver).await?;

    let key = KeyRecord::get(key_id, db)
        .await?
        .ok_or(CustodyError::NotFound("key"))?;
    let snapshot = KeySnapshot {
        key_id: Some(key.id),
        key_version: crypto.key_info(&key.public_key).key_id,
        key_name: Some(key.name),
    };

    let message = Message::create(sender, receiver, content, snapshot, db).await?;
    KeyRecord::touch(key_id, db).await?;

    tracing::info!(message_id = %message.id, %sender, %receiver, "stored message");
    Ok(message)
}

/// Encrypt `plaintext` with `key_id` and store the ciphertext
pub async fn send_encrypted(
    db: &Database,
    crypto: &dyn CryptoProvider,
    sender: DUuid,
    receiver: DUuid,
    plaintext: &str,
    key_id: DUuid,
) -> Result<Message, CustodyError> {
    gate(db, sender, receiver).await?;

    let sealed = cipher::encrypt(db, crypto, plaintext, key_id, sender).await?;
    let snapshot = KeySnapshot {
        key_id: Some(sealed.key_id),
        key_name: Some(sealed.key_name),
        key_version: Some(sealed.key_version),
    };

    let message = Message::create(sender, receiver, &sealed.ciphertext, snapshot, db).await?;
    KeyRecord::touch(key_id, db).await?;

    tracing::info!(message_id = %message.id, %sender, %receiver, "stored encrypted message");
    Ok(message)
}

/// The conversation between `caller` and `other`, oldest first
pub async fn history(
    db: &Database,
    caller: DUuid,
    other: DUuid,
) -> Result<Vec<Message>, CustodyError> {
    require_accepted(db, caller, other).await?;
    Ok(Message::between(caller, other, db).await?)
}
