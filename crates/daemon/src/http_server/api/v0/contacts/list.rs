use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::custody::{self, ContactList, CustodyError};
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::v0::Caller;
use crate::ServiceState;

/// Accepted contacts plus pending requests in both directions
#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct ListContactsRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListContactsResponse {
    #[serde(flatten)]
    pub list: ContactList,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Caller(caller): Caller,
    Json(_req): Json<ListContactsRequest>,
) -> Result<impl IntoResponse, CustodyError> {
    let list = custody::list_contacts(state.database(), caller).await?;
    Ok(Json(ListContactsResponse { list }))
}

impl ApiRequest for ListContactsRequest {
    type Response = ListContactsResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/contacts/list")?;
        Ok(client.post(full_url).json(&self))
    }
}
