use axum::routing::post;
use axum::Router;

pub mod delete;
pub mod generate;
pub mod get;
pub mod import;
pub mod list;
pub mod rename;
pub mod share;
pub mod verify;

pub use delete::{DeleteKeyRequest, DeleteKeyResponse};
pub use generate::{GenerateKeyRequest, GenerateKeyResponse};
pub use get::{GetKeyRequest, GetKeyResponse};
pub use import::{ImportKeyRequest, ImportKeyResponse};
pub use list::{ListKeysRequest, ListKeysResponse};
pub use rename::{RenameKeyRequest, RenameKeyResponse};
pub use share::{ShareKeyRequest, ShareKeyResponse};
pub use verify::{VerifyKeyRequest, VerifyKeyResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/generate", post(generate::handler))
        .route("/import", post(import::handler))
        .route("/list", post(list::handler))
        .route("/get", post(get::handler))
        .route("/rename", post(rename::handler))
        .route("/delete", post(delete::handler))
        .route("/share", post(share::handler))
        .route("/verify", post(verify::handler))
        .with_state(state)
}
