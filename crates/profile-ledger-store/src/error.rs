//! Error types for the document store.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use profile_ledger_pin::PublishError;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Publishing the document to the pinning network failed.
    #[error("pin failed: {0}")]
    SubmitFailed(#[from] PublishError),

    /// No record exists for the requested document id.
    #[error("not found")]
    NotFound,

    /// Signature verification is enabled and the document failed it.
    #[error("document signature rejected")]
    SignatureRejected,

    /// The request body could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A remote store answered with a non-success status.
    #[error("store returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// A remote store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A remote store's success response could not be decoded.
    #[error("invalid response from store: {0}")]
    InvalidResponse(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// HTTP status used when this error is returned from the router.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SubmitFailed(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::SignatureRejected => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Remote { .. } | Self::Unavailable(_) | Self::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = match &self {
            Self::SubmitFailed(e) => json!({
                "error": "pin failed",
                "detail": e.remote_body().map_or_else(|| e.to_string(), str::to_string),
            }),
            Self::NotFound => json!({ "error": "not found" }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let rejected = StoreError::SubmitFailed(PublishError::Rejected {
            status: 401,
            body: "nope".into(),
        });
        assert_eq!(rejected.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(StoreError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            StoreError::SignatureRejected.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            StoreError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StoreError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
