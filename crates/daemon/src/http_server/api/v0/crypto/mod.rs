use axum::routing::post;
use axum::Router;

pub mod decrypt;
pub mod encrypt;

pub use decrypt::{DecryptRequest, DecryptResponse};
pub use encrypt::{EncryptRequest, EncryptResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/encrypt", post(encrypt::handler))
        .route("/decrypt", post(decrypt::handler))
        .with_state(state)
}
