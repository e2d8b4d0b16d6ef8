//! Shared helpers for daemon integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::crypto::SealedBoxProvider;
use serde_json::Value;
use tower::ServiceExt;

use trustvault_daemon::custody::{self, RespondOutcome};
use trustvault_daemon::database::types::DUuid;
use trustvault_daemon::database::Database;
use trustvault_daemon::http_server::api::v0::CALLER_HEADER;
use trustvault_daemon::ServiceState;

pub const CRYPTO: SealedBoxProvider = SealedBoxProvider;

/// A fresh in-memory store
pub async fn setup_db() -> Database {
    Database::in_memory().await.unwrap()
}

/// Register a user named `name` with a derived email address
pub async fn user(db: &Database, name: &str) -> DUuid {
    custody::register(db, &format!("{}@example.com", name), name, "hash")
        .await
        .unwrap()
        .id
}

/// Request and accept a contact relationship between `a` and `b`
pub async fn connect(db: &Database, a: DUuid, b: DUuid) {
    let request = custody::request_contact(db, a, b).await.unwrap();
    let outcome = custody::respond_to_request(db, request.id, b, "accept")
        .await
        .unwrap();
    assert!(matches!(outcome, RespondOutcome::Accepted(_)));
}

/// The full API router over a fresh in-memory store
pub async fn setup_app() -> (Router, Database) {
    let db = setup_db().await;
    let state = ServiceState::new(db.clone(), Arc::new(SealedBoxProvider));
    (trustvault_daemon::http_server::router(state), db)
}

/// POST `body` to `path` as `caller` as a JSON client, returning the status and the
///  decoded JSON body
pub async fn post(
    app: &Router,
    path: &str,
    caller: Option<DUuid>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .header("accept", "application/json");
    if let Some(caller) = caller {
        builder = builder.header(CALLER_HEADER, caller.to_string());
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Register through the API and return the new user's id
pub async fn register(app: &Router, name: &str) -> DUuid {
    let (status, body) = post(
        app,
        "/api/v0/users/register",
        None,
        serde_json::json!({
            "email": format!("{}@example.com", name),
            "username": name,
            "credential_hash": "hash",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["user"]["id"].as_str().unwrap().parse().unwrap()
}
