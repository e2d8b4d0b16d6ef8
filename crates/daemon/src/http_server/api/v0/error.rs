use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::custody::CustodyError;

/// Body of every error response from the v0 API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl CustodyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CustodyError::NotFound(_) => StatusCode::NOT_FOUND,
            CustodyError::SelfReference
            | CustodyError::InvalidAction(_)
            | CustodyError::InvalidKey(_)
            | CustodyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CustodyError::DuplicateRelation(_) | CustodyError::DuplicateUser => {
                StatusCode::CONFLICT
            }
            CustodyError::Forbidden => StatusCode::FORBIDDEN,
            CustodyError::Decryption(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CustodyError::VaultNotFound(_)
            | CustodyError::Crypto(_)
            | CustodyError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CustodyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
            // internals stay in the log
            "internal server error".to_string()
        } else {
            tracing::debug!("request refused: {}", self);
            self.to_string()
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::types::{ContactStatus, DUuid};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CustodyError::NotFound("key"), StatusCode::NOT_FOUND),
            (CustodyError::SelfReference, StatusCode::BAD_REQUEST),
            (
                CustodyError::DuplicateRelation(ContactStatus::Pending),
                StatusCode::CONFLICT,
            ),
            (CustodyError::DuplicateUser, StatusCode::CONFLICT),
            (CustodyError::InvalidAction("x".into()), StatusCode::BAD_REQUEST),
            (CustodyError::Forbidden, StatusCode::FORBIDDEN),
            (
                CustodyError::Decryption("bad tag".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CustodyError::VaultNotFound(DUuid::new()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
