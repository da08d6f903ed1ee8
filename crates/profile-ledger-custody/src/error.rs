//! Error types for key custody.

use profile_ledger_core::CoreError;
use thiserror::Error;

/// Errors that can occur during custody operations.
#[derive(Debug, Error)]
pub enum CustodyError {
    /// The secure storage backend cannot be reached (locked, unsupported).
    #[error("secure storage unavailable: {0}")]
    Unavailable(String),

    /// The stored secret does not parse as a private key.
    #[error("stored secret is not a valid private key: {0}")]
    InvalidKey(#[from] CoreError),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CustodyError {
    /// Whether the failure is the backend being inaccessible, as opposed to
    /// the stored data being bad.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Database(_) | Self::Io(_) | Self::Migration(_)
        )
    }
}

/// Result type for custody operations.
pub type Result<T> = std::result::Result<T, CustodyError>;
