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

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RenameKeyRequest {
    #[arg(long)]
    pub key_id: DUuid,

    /// New display name
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameKeyResponse {
    pub key: KeyRecord,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<RenameKeyRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    tracing::info!("RENAME KEY: user={} key={}", caller, req.key_id);
    let key = custody::rename_key(state.database(), caller, req.key_id, &req.name).await?;
    Ok(Json(RenameKeyResponse { key }))
}

impl ApiRequest for RenameKeyRequest {
    type Response = RenameKeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/keys/rename")?;
        Ok(client.post(full_url).json(&self))
    }
}
