use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::database::types::DUuid;
use crate::database::Database;

use super::Vault;

/// Maximum number of profiles returned by a single search
pub const SEARCH_LIMIT: i64 = 5;

/// A registered identity. The credential hash is produced by the identity
///  collaborator and is opaque here.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DUuid,
    pub email: String,
    pub username: String,
    pub credential_hash: String,
    pub created_at: OffsetDateTime,
}

/// The part of a user other users may see
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct UserProfile {
    pub id: DUuid,
    pub username: String,
    pub email: String,
}

impl User {
    /// Insert the user and its vault in one transaction
    pub async fn create_with_vault(
        email: &str,
        username: &str,
        credential_hash: &str,
        db: &Database,
    ) -> Result<(User, Vault), sqlx::Error> {
        let now = OffsetDateTime::now_utc();
        let user_id = DUuid::new();
        let vault_id = DUuid::new();

        let mut tx = db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, credential_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(username)
        .bind(credential_hash)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO vaults (id, user_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(vault_id)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let user = User {
            id: user_id,
            email: email.to_string(),
            username: username.to_string(),
            credential_hash: credential_hash.to_string(),
            created_at: now,
        };
        let vault = Vault {
            id: vault_id,
            user_id,
            created_at: now,
        };

        Ok((user, vault))
    }

    pub async fn get(id: DUuid, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, credential_hash, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&**db)
        .await
    }


    /// Case-insensitive substring match on username or email, never returning
    ///  the caller themselves
    pub async fn search(
        caller: DUuid,
        query: &str,
        db: &Database,
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, username, email
            FROM users
            WHERE id <> ?1
              AND (LOWER(username) LIKE ?2 ESCAPE '\' OR email LIKE ?2 ESCAPE '\')
            ORDER BY username ASC
            LIMIT ?3
            "#,
        )
        .bind(caller)
        .bind(pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(&**db)
        .await
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("a_b%c\\"), "a\\_b\\%c\\\\");
        assert_eq!(escape_like("alice"), "alice");
    }

    #[tokio::test]
    async fn test_create_with_vault() {
        let db = Database::in_memory().await.unwrap();
        let (user, vault) = User::create_with_vault("a@example.com", "alice", "h", &db)
            .await
            .unwrap();

        assert_eq!(vault.user_id, user.id);
        let found = Vault::for_user(user.id, &db).await.unwrap().unwrap();
        assert_eq!(found.id, vault.id);
        let stored = User::get(user.id, &db).await.unwrap().unwrap();
        assert_eq!(stored.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_no_orphan_vault() {
        let db = Database::in_memory().await.unwrap();
        User::create_with_vault("a@example.com", "alice", "h", &db)
            .await
            .unwrap();
        let err = User::create_with_vault("a@example.com", "other", "h", &db)
            .await
            .unwrap_err();
        assert!(crate::database::is_unique_violation(&err));

        let (vaults,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vaults")
            .fetch_one(&*db)
            .await
            .unwrap();
        assert_eq!(vaults, 1);
    }

    #[tokio::test]
    async fn test_search() {
        let db = Database::in_memory().await.unwrap();
        let (alice, _) = User::create_with_vault("alice@example.com", "Alice", "h", &db)
            .await
            .unwrap();
        User::create_with_vault("bob@example.com", "Bob", "h", &db)
            .await
            .unwrap();
        User::create_with_vault("alicia@example.com", "Alicia", "h", &db)
            .await
            .unwrap();

        let hits = User::search(alice.id, "ALI", &db).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "Alicia");

        let hits = User::search(alice.id, "example", &db).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(User::search(alice.id, "%", &db).await.unwrap().is_empty());
    }
}
