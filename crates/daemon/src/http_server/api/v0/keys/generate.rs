use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError, GeneratedKey};
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Generate a personal key pair in your vault
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct GenerateKeyRequest {
    /// Display name for the key
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateKeyResponse {
    pub key: GeneratedKey,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<GenerateKeyRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    tracing::info!("GENERATE KEY: user={} name={}", caller, req.name);
    let key =
        custody::generate_key_pair(state.database(), state.crypto(), caller, &req.name).await?;
    Ok((http::StatusCode::CREATED, Json(GenerateKeyResponse { key })))
}

impl ApiRequest for GenerateKeyRequest {
    type Response = GenerateKeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/keys/generate")?;
        Ok(client.post(full_url).json(&self))
    }
}
