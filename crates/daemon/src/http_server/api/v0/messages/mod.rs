use axum::routing::post;
use axum::Router;

pub mod history;
pub mod send;

pub use history::{HistoryRequest, HistoryResponse};
pub use send::{SendMessageRequest, SendMessageResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/send", post(send::handler))
        .route("/history", post(history::handler))
        .with_state(state)
}
