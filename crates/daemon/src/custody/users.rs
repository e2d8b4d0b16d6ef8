use crate::database::is_unique_violation;
use crate::database::models::{User, UserProfile};
use crate::database::types::DUuid;
use crate::database::Database;

use super::CustodyError;

/// Shorter queries return nothing rather than half the user table
pub const MIN_SEARCH_LEN: usize = 3;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create a user and their (empty) vault
pub async fn register(
    db: &Database,
    email: &str,
    username: &str,
    credential_hash: &str,
) -> Result<User, CustodyError> {
    let email = normalize_email(email);
    let username = username.trim();

    if !email.contains('@') {
        return Err(CustodyError::InvalidInput("email address is malformed".into()));
    }
    if username.is_empty() {
        return Err(CustodyError::InvalidInput("username is required".into()));
    }
    if credential_hash.is_empty() {
        return Err(CustodyError::InvalidInput("credential hash is required".into()));
    }

    match User::create_with_vault(&email, username, credential_hash, db).await {
        Ok((user, vault)) => {
            tracing::info!(user_id = %user.id, vault_id = %vault.id, "registered user");
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => Err(CustodyError::DuplicateUser),
        Err(e) => Err(e.into()),
    }
}

pub async fn search(
    db: &Database,
    caller: DUuid,
    query: &str,
) -> Result<Vec<UserProfile>, CustodyError> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return Ok(Vec::new());
    }
    Ok(User::search(caller, query, db).await?)
}
