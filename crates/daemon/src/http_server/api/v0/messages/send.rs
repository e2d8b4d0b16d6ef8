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

/// Send a message to an accepted contact
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct SendMessageRequest {
    #[arg(long)]
    pub receiver_id: DUuid,

    /// Message body. Stored as given unless --encrypt is set.
    #[arg(long)]
    pub content: String,

    /// Key the content is (or will be) encrypted with
    #[arg(long)]
    pub key_id: DUuid,

    /// Encrypt `content` with `key_id` before storing it
    #[arg(long)]
    #[serde(default)]
    pub encrypt: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message: Message,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    tracing::info!(
        "SEND MESSAGE: {} -> {} (encrypt={})",
        caller,
        req.receiver_id,
        req.encrypt
    );

    let message = if req.encrypt {
        custody::send_encrypted(
            state.database(),
            state.crypto(),
            caller,
            req.receiver_id,
            &req.content,
            req.key_id,
        )
        .await?
    } else {
        custody::send_message(
            state.database(),
            state.crypto(),
            caller,
            req.receiver_id,
            &req.content,
            req.key_id,
        )
        .await?
    };

    Ok((http::StatusCode::CREATED, Json(SendMessageResponse { message })))
}

impl ApiRequest for SendMessageRequest {
    type Response = SendMessageResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/messages/send")?;
        Ok(client.post(full_url).json(&self))
    }
}
