use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError};
use crate::database::models::UserProfile;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Find other users by username or email
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct SearchRequest {
    /// At least three characters
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub users: Vec<UserProfile>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<SearchRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    let users = custody::search(state.database(), caller, &req.query).await?;
    tracing::debug!("SEARCH: caller={} hits={}", caller, users.len());
    Ok(Json(SearchResponse { users }))
}

impl ApiRequest for SearchRequest {
    type Response = SearchResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/users/search")?;
        Ok(client.post(full_url).json(&self))
    }
}
