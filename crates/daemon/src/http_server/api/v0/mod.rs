use axum::Router;

mod caller;
pub mod contacts;
pub mod crypto;
mod error;
pub mod keys;
pub mod messages;
pub mod users;

pub use caller::{Caller, CALLER_HEADER};
pub use error::ErrorBody;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/users", users::router(state.clone()))
        .nest("/contacts", contacts::router(state.clone()))
        .nest("/keys", keys::router(state.clone()))
        .nest("/crypto", crypto::router(state.clone()))
        .nest("/messages", messages::router(state.clone()))
        .with_state(state)
}
