//! Error types for Profile Ledger Core.

use thiserror::Error;

/// Core errors that can occur during key, signature, and document operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid private key")]
    InvalidKey,

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    #[error("invalid document identifier: {0}")]
    InvalidDocId(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
