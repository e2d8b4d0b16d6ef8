use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, CustodyError, RespondOutcome};
use crate::database::models::Contact;
use crate::database::types::DUuid;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Accept or reject a contact request addressed to you
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RespondRequest {
    /// Id of the pending request
    #[arg(long)]
    pub relation_id: DUuid,

    /// `accept` or `reject`
    #[arg(long)]
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondResponse {
    pub accepted: bool,
    /// The relationship after acceptance; absent when rejected
    pub contact: Option<Contact>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(req): Json<RespondRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    tracing::info!(
        "CONTACT RESPOND: {} {} {}",
        caller,
        req.action,
        req.relation_id
    );
    let outcome =
        custody::respond_to_request(state.database(), req.relation_id, caller, &req.action)
            .await?;

    let response = match outcome {
        RespondOutcome::Accepted(contact) => RespondResponse {
            accepted: true,
            contact: Some(contact),
        },
        RespondOutcome::Rejected => RespondResponse {
            accepted: false,
            contact: None,
        },
    };
    Ok(Json(response))
}

impl ApiRequest for RespondRequest {
    type Response = RespondResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/contacts/respond")?;
        Ok(client.post(full_url).json(&self))
    }
}
