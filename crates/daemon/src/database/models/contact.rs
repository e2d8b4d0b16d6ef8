use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::database::types::{ContactStatus, DUuid};
use crate::database::Database;

use super::UserProfile;

/// Trust level assigned on creation and again on acceptance
pub const BASELINE_TRUST: i64 = 1;

/// A relationship between two users. `user_id` initiated it, `contact_id` is
///  the only one who may accept it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: DUuid,
    pub user_id: DUuid,
    pub contact_id: DUuid,
    pub status: ContactStatus,
    pub trust_level: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A relationship as seen from one side, joined with the other party's profile
#[derive(Debug, Clone, FromRow)]
pub struct ContactWithProfile {
    pub id: DUuid,
    pub user_id: DUuid,
    pub contact_id: DUuid,
    pub status: ContactStatus,
    pub trust_level: i64,
    pub created_at: OffsetDateTime,
    pub other_id: DUuid,
    pub other_username: String,
    pub other_email: String,
}

impl ContactWithProfile {
    pub fn other(&self) -> UserProfile {
        UserProfile {
            id: self.other_id,
            username: self.other_username.clone(),
            email: self.other_email.clone(),
        }
    }
}

/// Canonical key for an unordered pair of users
pub fn pair_key(a: DUuid, b: DUuid) -> (DUuid, DUuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

const CONTACT_COLUMNS: &str =
    "id, user_id, contact_id, status, trust_level, created_at, updated_at";

impl Contact {
    /// Insert a pending request. Fails with a unique violation if any row
    ///  already exists for the pair, in either direction.
    pub async fn create_pending(
        user_id: DUuid,
        contact_id: DUuid,
        db: &Database,
    ) -> Result<Contact, sqlx::Error> {
        let id = DUuid::new();
        let now = OffsetDateTime::now_utc();
        let (low, high) = pair_key(user_id, contact_id);

        sqlx::query(
            r#"
            INSERT INTO contacts (
                id, user_id, contact_id, pair_low, pair_high,
                status, trust_level, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(contact_id)
        .bind(low)
        .bind(high)
        .bind(ContactStatus::Pending)
        .bind(BASELINE_TRUST)
        .bind(now)
        .execute(&**db)
        .await?;

        Ok(Contact {
            id,
            user_id,
            contact_id,
            status: ContactStatus::Pending,
            trust_level: BASELINE_TRUST,
            created_at: now,
            updated_at: now,
        })
    }

    /// The relationship between `a` and `b`, whichever of them initiated it
    pub async fn between(a: DUuid, b: DUuid, db: &Database) -> Result<Option<Contact>, sqlx::Error> {
        let (low, high) = pair_key(a, b);
        let query =
            format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE pair_low = ?1 AND pair_high = ?2");
        sqlx::query_as::<_, Contact>(&query)
            .bind(low)
            .bind(high)
            .fetch_optional(&**db)
            .await
    }

    pub async fn accepted_between(
        a: DUuid,
        b: DUuid,
        db: &Database,
    ) -> Result<Option<Contact>, sqlx::Error> {
        Ok(Self::between(a, b, db)
            .await?
            .filter(|c| c.status == ContactStatus::Accepted))
    }

    /// A relationship by id, but only if `target_id` is the side that received it
    pub async fn get_for_target(
        id: DUuid,
        target_id: DUuid,
        db: &Database,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query =
            format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1 AND contact_id = ?2");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(target_id)
            .fetch_optional(&**db)
            .await
    }

    /// Returns None if the row vanished (e.g. a concurrent reject)
    pub async fn accept(
        id: DUuid,
        target_id: DUuid,
        db: &Database,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE contacts
            SET status = ?3, trust_level = ?4, updated_at = ?5
            WHERE id = ?1 AND contact_id = ?2
            "#,
        )
        .bind(id)
        .bind(target_id)
        .bind(ContactStatus::Accepted)
        .bind(BASELINE_TRUST)
        .bind(OffsetDateTime::now_utc())
        .execute(&**db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get_for_target(id, target_id, db).await
    }

    pub async fn delete(id: DUuid, target_id: DUuid, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?1 AND contact_id = ?2")
            .bind(id)
            .bind(target_id)
            .execute(&**db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every relationship `user_id` takes part in, oldest first, each joined
    ///  with the profile of the other party
    pub async fn list_involving(
        user_id: DUuid,
        db: &Database,
    ) -> Result<Vec<ContactWithProfile>, sqlx::Error> {
        sqlx::query_as::<_, ContactWithProfile>(
            r#"
            SELECT
                c.id, c.user_id, c.contact_id, c.status, c.trust_level, c.created_at,
                u.id AS other_id, u.username AS other_username, u.email AS other_email
            FROM contacts c
            JOIN users u
              ON u.id = CASE WHEN c.user_id = ?1 THEN c.contact_id ELSE c.user_id END
            WHERE c.user_id = ?1 OR c.contact_id = ?1
            ORDER BY c.created_at ASC, c.rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&**db)
        .await
    }
}
