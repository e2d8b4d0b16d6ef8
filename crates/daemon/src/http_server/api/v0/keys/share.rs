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

/// Give an accepted contact a copy of one of your public keys
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ShareKeyRequest {
    #[arg(long)]
    pub key_id: DUuid,

    /// Id of the contact to share with
    #[arg(long)]
    pub contact_id: DUuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareKeyResponse {
    pub shared_key: KeyRecord,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<ShareKeyRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    tracing::info!(
        "SHARE KEY: owner={} contact={} key={}",
        caller,
        req.contact_id,
        req.key_id
    );
    let shared_key =
        custody::share_key(state.database(), caller, req.contact_id, req.key_id).await?;
    Ok(Json(ShareKeyResponse { shared_key }))
}

impl ApiRequest for ShareKeyRequest {
    type Response = ShareKeyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/keys/share")?;
        Ok(client.post(full_url).json(&self))
    }
}
