use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError};
use crate::database::models::KeySummary;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// List the keys in your vault
#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct ListKeysRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListKeysResponse {
    pub keys: Vec<KeySummary>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(_req): Json<ListKeysRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    let keys = custody::list_keys(state.database(), caller).await?;
    Ok(Json(ListKeysResponse { keys }))
}

impl ApiRequest for ListKeysRequest {
    type Response = ListKeysResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/keys/list")?;
        Ok(client.post(full_url).json(&self))
    }
}
