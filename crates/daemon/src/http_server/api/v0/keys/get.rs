use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError};
use crate::database::models::KeyRecord;
use crate::database::types::DUuid;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Show one key from your vault, including key material
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct GetKeyRequest {
    #[arg(long)]
    pub key_id: DUuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetKeyResponse {
    pub key: KeyRecord,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<GetKeyRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    let key = custody::get_key(state.database(), caller, req.key_id).await?;
    Ok(Json(GetKeyResponse { key }))
}

impl ApiRequest for GetKeyRequest {
    type Response = GetKeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/keys/get")?;
        Ok(client.post(full_url).json(&self))
    }
}
