use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::database::types::DUuid;
use crate::database::Database;

/// A stored message. `key_*` is a snapshot of the key at send time, not a
///  reference that has to stay valid.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: DUuid,
    pub sender_id: DUuid,
    pub receiver_id: DUuid,
    pub content: String,
    pub key_id: Option<DUuid>,
    pub key_name: Option<String>,
    pub key_version: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Key metadata copied onto a message when it is stored
#[derive(Debug, Clone, Default)]
pub struct KeySnapshot {
    pub key_id: Option<DUuid>,
    pub key_name: Option<String>,
    pub key_version: Option<String>,
}

impl Message {
    pub async fn create(
        sender_id: DUuid,
        receiver_id: DUuid,
        content: &str,
        snapshot: KeySnapshot,
        db: &Database,
    ) -> Result<Message, sqlx::Error> {
        let id = DUuid::new();
        let now = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO messages (
                id, sender_id, receiver_id, content,
                key_id, key_name, key_version, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(id)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .bind(snapshot.key_id)
        .bind(snapshot.key_name.as_deref())
        .bind(snapshot.key_version.as_deref())
        .bind(now)
        .execute(&**db)
        .await?;

        Ok(Message {
            id,
            sender_id,
            receiver_id,
            content: content.to_string(),
            key_id: snapshot.key_id,
            key_name: snapshot.key_name,
            key_version: snapshot.key_version,
            created_at: now,
        })
    }

    /// Every message exchanged between `a` and `b`, oldest first
    pub async fn between(a: DUuid, b: DUuid, db: &Database) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, receiver_id, content, key_id, key_name, key_version, created_at
            FROM messages
            WHERE (sender_id = ?1 AND receiver_id = ?2)
               OR (sender_id = ?2 AND receiver_id = ?1)
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_all(&**db)
        .await
    }
}
