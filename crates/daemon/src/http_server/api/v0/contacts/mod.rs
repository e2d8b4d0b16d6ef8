use axum::routing::post;
use axum::Router;

pub mod list;
pub mod request;
pub mod respond;

pub use list::{ListContactsRequest, ListContactsResponse};
pub use request::{RequestContactRequest, RequestContactResponse};
pub use respond::{RespondRequest, RespondResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/list", post(list::handler))
        .route("/request", post(request::handler))
        .route("/respond", post(respond::handler))
        .with_state(state)
}
