use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::custody::{self, CustodyError};
use crate::database::models::UserProfile;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

/// Register a new user. Credential hashing is done by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RegisterRequest {
    /// Email address; stored lowercased
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub username: String,

    /// Opaque credential hash supplied by the identity provider
    #[arg(long)]
    pub credential_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserProfile,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    tracing::info!("REGISTER: username={}", req.username);

    let user = custody::register(
        state.database(),
        &req.email,
        &req.username,
        &req.credential_hash,
    )
    .await?;

    Ok((
        http::StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.profile(),
            created_at: user.created_at,
        }),
    ))
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/users/register")?;
        Ok(client.post(full_url).json(&self))
    }
}
