use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::database::types::{DUuid, KeyKind};
use crate::database::Database;

/// A stored key, either the vault owner's own pair or someone else's public key
///
/// `private_key` is only ever set on `Personal` records; the schema enforces it.
/// Shared copies carry `origin_key_id` (the record they were copied from) and
/// `shared_with_user_id` (the recipient, i.e. this vault's owner).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KeyRecord {
    pub id: DUuid,
    pub vault_id: DUuid,
    pub name: String,
    pub public_key: String,
    pub private_key: Option<String>,
    pub kind: KeyKind,
    pub origin_key_id: Option<DUuid>,
    pub shared_with_user_id: Option<DUuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_used_at: Option<OffsetDateTime>,
}

/// Listing view of a key record. Never carries key material.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KeySummary {
    pub id: DUuid,
    pub name: String,
    pub kind: KeyKind,
    pub origin_key_id: Option<DUuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_used_at: Option<OffsetDateTime>,
}

/// A shared copy held by some user, annotated with who owns the origin key.
///  `origin_owner_id` is `None` once the origin key has been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedKeySummary {
    pub id: DUuid,
    pub name: String,
    pub origin_key_id: Option<DUuid>,
    pub origin_owner_id: Option<DUuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const KEY_COLUMNS: &str = r#"
    k.id, k.vault_id, k.name, k.public_key, k.private_key, k.kind,
    k.origin_key_id, k.shared_with_user_id, k.created_at, k.last_used_at
"#;

impl KeyRecord {
    /// Store a freshly generated pair in the owner's vault
    pub async fn create_personal(
        vault_id: DUuid,
        name: &str,
        public_key: &str,
        private_key: &str,
        db: &Database,
    ) -> Result<KeyRecord, sqlx::Error> {
        Self::insert(
            vault_id,
            name,
            public_key,
            Some(private_key),
            KeyKind::Personal,
            None,
            None,
            db,
        )
        .await
    }

    /// Store an externally supplied public key. No origin, no recipient marker.
    pub async fn create_imported(
        vault_id: DUuid,
        name: &str,
        public_key: &str,
        db: &Database,
    ) -> Result<KeyRecord, sqlx::Error> {
        Self::insert(
            vault_id,
            name,
            public_key,
            None,
            KeyKind::Contact,
            None,
            None,
            db,
        )
        .await
    }

    /// Store a shared copy of `origin_key_id` in `vault_id`
    ///
    /// Idempotent per (vault, origin, recipient): a second share, concurrent or
    /// not, resolves to the row that already exists.
    pub async fn create_shared(
        vault_id: DUuid,
        name: &str,
        public_key: &str,
        origin_key_id: DUuid,
        shared_with_user_id: DUuid,
        db: &Database,
    ) -> Result<KeyRecord, sqlx::Error> {
        let id = DUuid::new();
        let now = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO keys (
                id, vault_id, name, public_key, private_key, kind,
                origin_key_id, shared_with_user_id, created_at
            )
            VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7, ?8)
            ON CONFLICT (vault_id, origin_key_id, shared_with_user_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(vault_id)
        .bind(name)
        .bind(public_key)
        .bind(KeyKind::Contact)
        .bind(origin_key_id)
        .bind(shared_with_user_id)
        .bind(now)
        .execute(&**db)
        .await?;

        let query = format!(
            r#"
            SELECT {KEY_COLUMNS}
            FROM keys k
            WHERE k.vault_id = ?1 AND k.origin_key_id = ?2 AND k.shared_with_user_id = ?3
            "#
        );
        sqlx::query_as::<_, KeyRecord>(&query)
            .bind(vault_id)
            .bind(origin_key_id)
            .bind(shared_with_user_id)
            .fetch_one(&**db)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert(
        vault_id: DUuid,
        name: &str,
        public_key: &str,
        private_key: Option<&str>,
        kind: KeyKind,
        origin_key_id: Option<DUuid>,
        shared_with_user_id: Option<DUuid>,
        db: &Database,
    ) -> Result<KeyRecord, sqlx::Error> {
        let id = DUuid::new();
        let now = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO keys (
                id, vault_id, name, public_key, private_key, kind,
                origin_key_id, shared_with_user_id, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(id)
        .bind(vault_id)
        .bind(name)
        .bind(public_key)
        .bind(private_key)
        .bind(kind)
        .bind(origin_key_id)
        .bind(shared_with_user_id)
        .bind(now)
        .execute(&**db)
        .await?;

        Ok(KeyRecord {
            id,
            vault_id,
            name: name.to_string(),
            public_key: public_key.to_string(),
            private_key: private_key.map(str::to_string),
            kind,
            origin_key_id,
            shared_with_user_id,
            created_at: now,
            last_used_at: None,
        })
    }

    /// Fetch a key wherever it lives. Only encryption resolves keys this way.
    pub async fn get(id: DUuid, db: &Database) -> Result<Option<KeyRecord>, sqlx::Error> {
        let query = format!("SELECT {KEY_COLUMNS} FROM keys k WHERE k.id = ?1");
        sqlx::query_as::<_, KeyRecord>(&query)
            .bind(id)
            .fetch_optional(&**db)
            .await
    }

    /// Fetch a key only if it sits in `user_id`'s vault
    pub async fn get_for_user(
        id: DUuid,
        user_id: DUuid,
        db: &Database,
    ) -> Result<Option<KeyRecord>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {KEY_COLUMNS}
            FROM keys k
            JOIN vaults v ON v.id = k.vault_id
            WHERE k.id = ?1 AND v.user_id = ?2
            "#
        );
        sqlx::query_as::<_, KeyRecord>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&**db)
            .await
    }

    /// Most recently used first, never-used keys last, ties broken newest first
    pub async fn list_for_user(
        user_id: DUuid,
        db: &Database,
    ) -> Result<Vec<KeySummary>, sqlx::Error> {
        sqlx::query_as::<_, KeySummary>(
            r#"
            SELECT k.id, k.name, k.kind, k.origin_key_id, k.created_at, k.last_used_at
            FROM keys k
            JOIN vaults v ON v.id = k.vault_id
            WHERE v.user_id = ?1
            ORDER BY k.last_used_at IS NULL ASC, k.last_used_at DESC,
                     k.created_at DESC, k.rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&**db)
        .await
    }

    /// Shared copies in `holder_id`'s vault, with the owner of each origin key
    pub async fn shared_with(
        holder_id: DUuid,
        db: &Database,
    ) -> Result<Vec<SharedKeySummary>, sqlx::Error> {
        sqlx::query_as::<_, SharedKeySummary>(
            r#"
            SELECT k.id, k.name, k.origin_key_id, ov.user_id AS origin_owner_id, k.created_at
            FROM keys k
            JOIN vaults v ON v.id = k.vault_id
            LEFT JOIN keys o ON o.id = k.origin_key_id
            LEFT JOIN vaults ov ON ov.id = o.vault_id
            WHERE v.user_id = ?1 AND k.origin_key_id IS NOT NULL
            ORDER BY k.created_at ASC, k.rowid ASC
            "#,
        )
        .bind(holder_id)
        .fetch_all(&**db)
        .await
    }

    /// Returns false if no such key exists in `user_id`'s vault
    pub async fn rename(
        id: DUuid,
        user_id: DUuid,
        name: &str,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE keys
            SET name = ?3
            WHERE id = ?1
              AND vault_id IN (SELECT id FROM vaults WHERE user_id = ?2)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .execute(&**db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns false if no such key exists in `user_id`'s vault
    pub async fn delete(id: DUuid, user_id: DUuid, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM keys
            WHERE id = ?1
              AND vault_id IN (SELECT id FROM vaults WHERE user_id = ?2)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&**db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn touch(id: DUuid, db: &Database) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE keys SET last_used_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(OffsetDateTime::now_utc())
            .execute(&**db)
            .await?;
        Ok(())
    }

    pub fn has_private_material(&self) -> bool {
        self.kind == KeyKind::Personal && self.private_key.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::models::User;

    async fn setup() -> (Database, DUuid, DUuid, DUuid, DUuid) {
        let db = Database::in_memory().await.unwrap();
        let (alice, alice_vault) = User::create_with_vault("a@example.com", "alice", "h", &db)
            .await
            .unwrap();
        let (bob, bob_vault) = User::create_with_vault("b@example.com", "bob", "h", &db)
            .await
            .unwrap();
        (db, alice.id, alice_vault.id, bob.id, bob_vault.id)
    }

    #[tokio::test]
    async fn test_scoped_lookup_hides_other_vaults() {
        let (db, alice, alice_vault, bob, _) = setup().await;
        let key = KeyRecord::create_personal(alice_vault, "k", "PUB", "PRIV", &db)
            .await
            .unwrap();

        assert!(KeyRecord::get_for_user(key.id, alice, &db).await.unwrap().is_some());
        assert!(KeyRecord::get_for_user(key.id, bob, &db).await.unwrap().is_none());
        assert!(KeyRecord::get(key.id, &db).await.unwrap().is_some());
        assert!(!KeyRecord::rename(key.id, bob, "x", &db).await.unwrap());
        assert!(!KeyRecord::delete(key.id, bob, &db).await.unwrap());
    }

    #[tokio::test]
    async fn test_shared_copy_is_idempotent() {
        let (db, alice, alice_vault, bob, bob_vault) = setup().await;
        let key = KeyRecord::create_personal(alice_vault, "k", "PUB", "PRIV", &db)
            .await
            .unwrap();

        let first = KeyRecord::create_shared(bob_vault, "k (alice)", "PUB", key.id, bob, &db)
            .await
            .unwrap();
        let second = KeyRecord::create_shared(bob_vault, "k (alice)", "PUB", key.id, bob, &db)
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.private_key, None);

        let shared = KeyRecord::shared_with(bob, &db).await.unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].origin_owner_id, Some(alice));
    }

    #[tokio::test]
    async fn test_contact_key_cannot_hold_private_material() {
        let (db, _, alice_vault, _, _) = setup().await;
        let result = KeyRecord::insert(
            alice_vault,
            "bad",
            "PUB",
            Some("PRIV"),
            KeyKind::Contact,
            None,
            None,
            &db,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_orders_by_last_use() {
        let (db, alice, alice_vault, _, _) = setup().await;
        let older = KeyRecord::create_personal(alice_vault, "older", "P1", "S1", &db)
            .await
            .unwrap();
        let newer = KeyRecord::create_imported(alice_vault, "newer", "P2", &db)
            .await
            .unwrap();
        let used = KeyRecord::create_imported(alice_vault, "used", "P3", &db)
            .await
            .unwrap();
        KeyRecord::touch(used.id, &db).await.unwrap();

        let ids: Vec<DUuid> = KeyRecord::list_for_user(alice, &db)
            .await
            .unwrap()
            .into_iter()
            .map(|k| k.id)
            .collect();
        assert_eq!(ids, vec![used.id, newer.id, older.id]);
    }
}
