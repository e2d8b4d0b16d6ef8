use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::request::Parts;

use crate::database::types::DUuid;

use super::ErrorBody;

/// Header carrying the id of the authenticated user. Whatever sits in front of
///  the daemon is trusted to have authenticated it.
pub const CALLER_HEADER: &str = "x-trustvault-user";

/// The authenticated user a request is made on behalf of
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub DUuid);

fn unauthorized(reason: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: reason.to_string(),
        }),
    )
        .into_response()
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| unauthorized("not authenticated"))?;

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<DUuid>().ok())
            .map(Caller)
            .ok_or_else(|| unauthorized("malformed caller identity"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(header: Option<&str>) -> Result<Caller, Response> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(CALLER_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_caller_header() {
        let id = DUuid::new();
        let caller = extract(Some(&id.to_string())).await.unwrap();
        assert_eq!(caller.0, id);

        let missing = extract(None).await.unwrap_err();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let malformed = extract(Some("alice")).await.unwrap_err();
        assert_eq!(malformed.status(), StatusCode::UNAUTHORIZED);
    }
}
