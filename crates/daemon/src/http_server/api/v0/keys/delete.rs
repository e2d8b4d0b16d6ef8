use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError};
use crate::database::types::DUuid;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Delete a key from your vault. Messages sent with it keep their snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DeleteKeyRequest {
    #[arg(long)]
    pub key_id: DUuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteKeyResponse {
    pub key_id: DUuid,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<DeleteKeyRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    tracing::info!("DELETE KEY: user={} key={}", caller, req.key_id);
    custody::delete_key(state.database(), caller, req.key_id).await?;
    Ok(Json(DeleteKeyResponse { key_id: req.key_id }))
}

impl ApiRequest for DeleteKeyRequest {
    type Response = DeleteKeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/keys/delete")?;
        Ok(client.post(full_url).json(&self))
    }
}
