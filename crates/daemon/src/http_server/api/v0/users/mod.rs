use axum::routing::post;
use axum::Router;

pub mod register;
pub mod search;

pub use register::{RegisterRequest, RegisterResponse};
pub use search::{SearchRequest, SearchResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/register", post(register::handler))
        .route("/search", post(search::handler))
        .with_state(state)
}
