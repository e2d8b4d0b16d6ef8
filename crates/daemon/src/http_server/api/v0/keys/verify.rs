use axum::extract::{Json, State};
use axum::response::IntoResponse;
use common::crypto::KeyInfo;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

/// Inspect an armored key without storing it
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct VerifyKeyRequest {
    /// Armored public or private key
    #[arg(long)]
    pub armored: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyKeyResponse {
    #[serde(flatten)]
    pub info: KeyInfo,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<VerifyKeyRequest>,
) -> impl IntoResponse {
    let info = custody::verify_key(state.crypto(), &req.armored);
    Json(VerifyKeyResponse { info })
}

impl ApiRequest for VerifyKeyRequest {
    type Response = VerifyKeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/keys/verify")?;
        Ok(client.post(full_url).json(&self))
    }
}
