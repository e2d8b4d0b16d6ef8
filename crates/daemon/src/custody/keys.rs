use common::crypto::{CryptoError, CryptoProvider, KeyInfo};
use serde::{Deserialize, Serialize};

use crate::database::models::{KeyRecord, KeySummary, User, Vault};
use crate::database::types::DUuid;
use crate::database::Database;

use super::CustodyError;

/// A newly generated personal key. The private half is returned once, to
///  its owner, and nothing records that it was handed out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedKey {
    pub key_id: DUuid,
    pub name: String,
    pub public_key: String,
    pub private_key: String,
}

fn require_name(name: &str) -> Result<&str, CustodyError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CustodyError::InvalidInput("key name is required".into()));
    }
    Ok(name)
}

async fn vault_of(db: &Database, user_id: DUuid) -> Result<Vault, CustodyError> {
    Vault::for_user(user_id, db)
        .await?
        .ok_or(CustodyError::VaultNotFound(user_id))
}

pub async fn generate_key_pair(
    db: &Database,
    crypto: &dyn CryptoProvider,
    user_id: DUuid,
    name: &str,
) -> Result<GeneratedKey, CustodyError> {
    let name = require_name(name)?;
    let user = User::get(user_id, db)
        .await?
        .ok_or(CustodyError::NotFound("user"))?;
    let vault = vault_of(db, user_id).await?;

    let pair = crypto.generate_key_pair(&user.username, &user.email)?;
    let record =
        KeyRecord::create_personal(vault.id, name, &pair.public_key, &pair.private_key, db)
            .await?;

    tracing::info!(key_id = %record.id, %user_id, "generated personal key");
    Ok(GeneratedKey {
        key_id: record.id,
        name: record.name,
        public_key: pair.public_key,
        private_key: pair.private_key,
    })
}

/// Store someone else's public key in the caller's vault
pub async fn import_public_key(
    db: &Database,
    crypto: &dyn CryptoProvider,
    user_id: DUuid,
    name: &str,
    armored_public_key: &str,
) -> Result<KeyRecord, CustodyError> {
    let name = require_name(name)?;
    crypto
        .read_public_key(armored_public_key)
        .map_err(|e| match e {
            CryptoError::InvalidKey(reason) => CustodyError::InvalidKey(reason),
            other => CustodyError::InvalidKey(other.to_string()),
        })?;
    let vault = vault_of(db, user_id).await?;

    let record = KeyRecord::create_imported(vault.id, name, armored_public_key.trim(), db).await?;
    tracing::info!(key_id = %record.id, %user_id, "imported public key");
    Ok(record)
}

pub async fn list_keys(db: &Database, user_id: DUuid) -> Result<Vec<KeySummary>, CustodyError> {
    Ok(KeyRecord::list_for_user(user_id, db).await?)
}

pub async fn get_key(
    db: &Database,
    user_id: DUuid,
    key_id: DUuid,
) -> Result<KeyRecord, CustodyError> {
    KeyRecord::get_for_user(key_id, user_id, db)
        .await?
        .ok_or(CustodyError::NotFound("key"))
}

pub async fn rename_key(
    db: &Database,
    user_id: DUuid,
    key_id: DUuid,
    name: &str,
) -> Result<KeyRecord, CustodyError> {
    let name = require_name(name)?;
    if !KeyRecord::rename(key_id, user_id, name, db).await? {
        return Err(CustodyError::NotFound("key"));
    }
    get_key(db, user_id, key_id).await
}

/// Delete a key from the caller's vault. Shared copies and message history
///  that mention it are left alone.
pub async fn delete_key(db: &Database, user_id: DUuid, key_id: DUuid) -> Result<(), CustodyError> {
    if !KeyRecord::delete(key_id, user_id, db).await? {
        return Err(CustodyError::NotFound("key"));
    }
    tracing::info!(%key_id, %user_id, "deleted key");
    Ok(())
}

pub fn verify_key(crypto: &dyn CryptoProvider, armored: &str) -> KeyInfo {
    crypto.key_info(armored)
}
