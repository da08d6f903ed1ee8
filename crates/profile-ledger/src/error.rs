//! Error types for profile registration.

use std::path::PathBuf;

use profile_ledger_core::CoreError;
use profile_ledger_custody::CustodyError;
use profile_ledger_pin::PublishError;
use profile_ledger_store::StoreError;
use thiserror::Error;

/// Errors that can occur while saving a profile.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The device keypair could not be loaded or created.
    #[error("wallet not ready: {0}")]
    WalletNotReady(#[from] CustodyError),

    /// Building or signing the document failed.
    #[error("signing error: {0}")]
    Core(#[from] CoreError),

    /// Pinning the avatar failed.
    #[error("avatar upload failed: {0}")]
    Publish(#[from] PublishError),

    /// Submitting the document failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The avatar file could not be read.
    #[error("failed to read avatar {}: {source}", .path.display())]
    Avatar {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but its value does not parse.
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type for profile registration.
pub type Result<T> = std::result::Result<T, FlowError>;
