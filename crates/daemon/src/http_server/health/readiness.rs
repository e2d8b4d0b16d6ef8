use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::time::timeout;

use super::data_source::*;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// 200 once the store answers, 503 otherwise
#[tracing::instrument]
pub async fn handler(data_src: StateDataSource) -> Response {
    let outcome = timeout(READINESS_TIMEOUT, data_src.is_ready()).await;

    let message = match outcome {
        Ok(Ok(())) => {
            return (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response();
        }
        Ok(Err(DataSourceError::DependencyFailure)) => "database is not available",
        Err(_) => "readiness check timed out",
    };

    let body = serde_json::json!({"status": "failure", "message": message});
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}
