use axum::routing::get;
use axum::Router;

mod data_source;
mod readiness;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/readiness", get(readiness::handler))
        .with_state(state)
}
