use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError};
use crate::database::models::Contact;
use crate::database::types::DUuid;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Ask another user to become a contact
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RequestContactRequest {
    /// Id of the user to add
    #[arg(long)]
    pub contact_id: DUuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContactResponse {
    pub request: Contact,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<RequestContactRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    tracing::info!("CONTACT REQUEST: {} -> {}", caller, req.contact_id);
    let request = custody::request_contact(state.database(), caller, req.contact_id).await?;
    Ok((
        http::StatusCode::CREATED,
        Json(RequestContactResponse { request }),
    ))
}

impl ApiRequest for RequestContactRequest {
    type Response = RequestContactResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/contacts/request")?;
        Ok(client.post(full_url).json(&self))
    }
}
