use sqlx::FromRow;
use time::OffsetDateTime;

use crate::database::types::DUuid;
use crate::database::Database;

/// Per-user key container. Exactly one exists per user.
#[derive(Debug, Clone, FromRow)]
pub struct Vault {
    pub id: DUuid,
    pub user_id: DUuid,
    pub created_at: OffsetDateTime,
}

impl Vault {
    pub async fn for_user(user_id: DUuid, db: &Database) -> Result<Option<Vault>, sqlx::Error> {
        sqlx::query_as::<_, Vault>(
            r#"
            SELECT id, user_id, created_at
            FROM vaults
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&**db)
        .await
    }
}
