use crate::database::models::{Contact, KeyRecord, User, Vault};
use crate::database::types::DUuid;
use crate::database::Database;

use super::CustodyError;

fn shared_name(key_name: &str, sharer: &str) -> String {
    format!("{key_name} (shared by {sharer})")
}

/// Copy the public half of one of `owner_id`'s keys into `contact_id`'s vault
///
/// Only `public_key` is ever read from the source record. Sharing the same key
/// with the same contact twice returns the copy made the first time.
pub async fn share_key(
    db: &Database,
    owner_id: DUuid,
    contact_id: DUuid,
    key_id: DUuid,
) -> Result<KeyRecord, CustodyError> {
    let source = KeyRecord::get_for_user(key_id, owner_id, db)
        .await?
        .ok_or(CustodyError::NotFound("key"))?;

    if Contact::accepted_between(owner_id, contact_id, db)
        .await?
        .is_none()
    {
        return Err(CustodyError::NotFound("contact"));
    }

    let destination = Vault::for_user(contact_id, db)
        .await?
        .ok_or(CustodyError::NotFound("vault"))?;
    let owner = User::get(owner_id, db)
        .await?
        .ok_or(CustodyError::NotFound("user"))?;

    let copy = KeyRecord::create_shared(
        destination.id,
        &shared_name(&source.name, &owner.username),
        &source.public_key,
        source.id,
        contact_id,
        db,
    )
    .await?;

    tracing::info!(
        source_key_id = %source.id,
        shared_key_id = %copy.id,
        %owner_id,
        %contact_id,
        "shared key"
    );
    Ok(copy)
}
