use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError};
use crate::database::models::Message;
use crate::database::types::DUuid;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Conversation with a contact, oldest first
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct HistoryRequest {
    /// The other party
    #[arg(long)]
    pub user_id: DUuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<HistoryRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    let messages = custody::history(state.database(), caller, req.user_id).await?;
    Ok(Json(HistoryResponse { messages }))
}

impl ApiRequest for HistoryRequest {
    type Response = HistoryResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/messages/history")?;
        Ok(client.post(full_url).json(&self))
    }
}
