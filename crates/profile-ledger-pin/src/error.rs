//! Error types for content publishing.

use thiserror::Error;

/// Errors that can occur while publishing content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The pinning network could not be reached (transport failure, timeout,
    /// or no credentials configured).
    #[error("pinning network unavailable: {0}")]
    Unavailable(String),

    /// The pinning network answered with a non-success status.
    #[error("pinning network rejected request with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// A success response could not be decoded.
    #[error("invalid response from pinning network: {0}")]
    InvalidResponse(String),

    /// The request could not be built (bad mime type, unserializable payload).
    #[error("invalid publish request: {0}")]
    InvalidRequest(String),
}

impl PublishError {
    /// The remote diagnostic text, for rejections.
    pub fn remote_body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;
