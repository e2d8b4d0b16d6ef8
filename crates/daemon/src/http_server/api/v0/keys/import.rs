use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError};
use crate::database::models::KeyRecord;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Import someone's armored public key into your vault
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ImportKeyRequest {
    #[arg(long)]
    pub name: String,

    /// Armored public key, e.g. `--public-key "$(cat bob.pub)"`
    #[arg(long)]
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportKeyResponse {
    pub key: KeyRecord,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<ImportKeyRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    tracing::info!("IMPORT KEY: user={} name={}", caller, req.name);
    let key = custody::import_public_key(
        state.database(),
        state.crypto(),
        caller,
        &req.name,
        &req.public_key,
    )
    .await?;
    Ok((http::StatusCode::CREATED, Json(ImportKeyResponse { key })))
}

impl ApiRequest for ImportKeyRequest {
    type Response = ImportKeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/keys/import")?;
        Ok(client.post(full_url).json(&self))
    }
}
