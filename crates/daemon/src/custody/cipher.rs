use common::crypto::CryptoProvider;
use serde::{Deserialize, Serialize};

use crate::database::models::KeyRecord;
use crate::database::types::DUuid;
use crate::database::Database;

use super::CustodyError;

/// Output of [`encrypt`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encrypted {
    pub ciphertext: String,
    /// Identifier of the public key the ciphertext was sealed to
    pub key_version: String,
    pub key_id: DUuid,
    pub key_name: String,
}

/// Encrypt `plaintext` with any stored key
///
/// The key is looked up without an ownership filter: encrypting for someone
/// only needs their public half, and that may live in anyone's vault.
pub async fn encrypt(
    db: &Database,
    crypto: &dyn CryptoProvider,
    plaintext: &str,
    key_id: DUuid,
    caller: DUuid,
) -> Result<Encrypted, CustodyError> {
    let record = KeyRecord::get(key_id, db)
        .await?
        .ok_or(CustodyError::NotFound("key"))?;

    let public_key = crypto.read_public_key(&record.public_key)?;
    let ciphertext = crypto.encrypt(plaintext, &public_key)?;

    tracing::debug!(%key_id, %caller, "encrypted message");
    Ok(Encrypted {
        ciphertext,
        key_version: public_key.key_id(),
        key_id: record.id,
        key_name: record.name,
    })
}

/// Decrypt with a personal key from the caller's own vault
pub async fn decrypt(
    db: &Database,
    crypto: &dyn CryptoProvider,
    ciphertext: &str,
    key_id: DUuid,
    caller: DUuid,
) -> Result<String, CustodyError> {
    let record = KeyRecord::get_for_user(key_id, caller, db)
        .await?
        .filter(KeyRecord::has_private_material)
        .ok_or(CustodyError::NotFound("key"))?;
    let Some(armored_private) = record.private_key.as_deref() else {
        return Err(CustodyError::NotFound("key"));
    };

    let secret = crypto
        .read_private_key(armored_private)
        .map_err(|e| CustodyError::Decryption(e.to_string()))?;
    let plaintext = crypto
        .decrypt(ciphertext, &secret)
        .map_err(|e| CustodyError::Decryption(e.to_string()))?;

    KeyRecord::touch(record.id, db).await?;
    tracing::debug!(%key_id, %caller, "decrypted message");
    Ok(plaintext)
}

#[cfg(test)]
mod test {
    use common::crypto::SealedBoxProvider;

    use super::*;
    use crate::custody::{generate_key_pair, get_key, import_public_key, register};

    #[tokio::test]
    async fn test_round_trip() {
        let db = Database::in_memory().await.unwrap();
        let alice = register(&db, "a@example.com", "alice", "h").await.unwrap();
        let key = generate_key_pair(&db, &SealedBoxProvider, alice.id, "main")
            .await
            .unwrap();

        let sealed = encrypt(&db, &SealedBoxProvider, "attack at dawn", key.key_id, alice.id)
            .await
            .unwrap();
        assert_ne!(sealed.ciphertext, "attack at dawn");
        assert_eq!(sealed.key_version.len(), 16);

        let opened = decrypt(&db, &SealedBoxProvider, &sealed.ciphertext, key.key_id, alice.id)
            .await
            .unwrap();
        assert_eq!(opened, "attack at dawn");
        let record = get_key(&db, alice.id, key.key_id).await.unwrap();
        assert!(record.last_used_at.is_some());
    }

    #[tokio::test]
    async fn test_encrypt_with_anyones_key() {
        let db = Database::in_memory().await.unwrap();
        let alice = register(&db, "a@example.com", "alice", "h").await.unwrap();
        let mallory = register(&db, "m@example.com", "mallory", "h").await.unwrap();
        let key = generate_key_pair(&db, &SealedBoxProvider, alice.id, "main")
            .await
            .unwrap();

        let sealed = encrypt(&db, &SealedBoxProvider, "for alice", key.key_id, mallory.id)
            .await
            .unwrap();

        let result =
            decrypt(&db, &SealedBoxProvider, &sealed.ciphertext, key.key_id, mallory.id).await;
        assert!(matches!(result, Err(CustodyError::NotFound(_))));

        let missing = encrypt(&db, &SealedBoxProvider, "x", DUuid::new(), alice.id).await;
        assert!(matches!(missing, Err(CustodyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_public_only_key_cannot_decrypt() {
        let db = Database::in_memory().await.unwrap();
        let alice = register(&db, "a@example.com", "alice", "h").await.unwrap();
        let pair = SealedBoxProvider.generate_key_pair("bob", "b@example.com").unwrap();
        let imported =
            import_public_key(&db, &SealedBoxProvider, alice.id, "bob", &pair.public_key)
                .await
                .unwrap();

        let sealed = encrypt(&db, &SealedBoxProvider, "hi", imported.id, alice.id)
            .await
            .unwrap();
        let result = decrypt(&db, &SealedBoxProvider, &sealed.ciphertext, imported.id, alice.id).await;
        assert!(matches!(result, Err(CustodyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_wrong_key_is_decryption_error() {
        let db = Database::in_memory().await.unwrap();
        let alice = register(&db, "a@example.com", "alice", "h").await.unwrap();
        let first = generate_key_pair(&db, &SealedBoxProvider, alice.id, "one")
            .await
            .unwrap();
        let second = generate_key_pair(&db, &SealedBoxProvider, alice.id, "two")
            .await
            .unwrap();

        let sealed = encrypt(&db, &SealedBoxProvider, "hi", first.key_id, alice.id)
            .await
            .unwrap();
        let result =
            decrypt(&db, &SealedBoxProvider, &sealed.ciphertext, second.key_id, alice.id).await;
        assert!(matches!(result, Err(CustodyError::Decryption(_))));

        let result = decrypt(&db, &SealedBoxProvider, "not armored", first.key_id, alice.id).await;
        assert!(matches!(result, Err(CustodyError::Decryption(_))));
    }
}
