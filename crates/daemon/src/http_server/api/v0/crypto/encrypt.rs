use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError, Encrypted};
use crate::database::types::DUuid;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Encrypt text with any stored key
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct EncryptRequest {
    #[arg(long)]
    pub key_id: DUuid,

    #[arg(long)]
    pub plaintext: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    #[serde(flatten)]
    pub encrypted: Encrypted,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<EncryptRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    let encrypted = custody::encrypt(
        state.database(),
        state.crypto(),
        &req.plaintext,
        req.key_id,
        caller,
    )
    .await?;
    Ok(Json(EncryptResponse { encrypted }))
}

impl ApiRequest for EncryptRequest {
    type Response = EncryptResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/crypto/encrypt")?;
        Ok(client.post(full_url).json(&self))
    }
}
