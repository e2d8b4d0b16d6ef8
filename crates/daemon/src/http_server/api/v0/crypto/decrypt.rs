use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError};
use crate::database::types::DUuid;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Decrypt with one of your own personal keys
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DecryptRequest {
    #[arg(long)]
    pub key_id: DUuid,

    /// Armored ciphertext
    #[arg(long)]
    pub ciphertext: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub plaintext: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<DecryptRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    let plaintext = custody::decrypt(
        state.database(),
        state.crypto(),
        &req.ciphertext,
        req.key_id,
        caller,
    )
    .await?;
    Ok(Json(DecryptResponse { plaintext }))
}

impl ApiRequest for DecryptRequest {
    type Response = DecryptResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/crypto/decrypt")?;
        Ok(client.post(full_url).json(&self))
    }
}
