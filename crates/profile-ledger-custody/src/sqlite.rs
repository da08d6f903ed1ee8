//! SQLite implementation of the SecretStore trait.
//!
//! The device keystore used outside of tests. One file, one table, rusqlite
//! with bundled SQLite, wrapped in async via tokio::spawn_blocking. On Unix the
//! database file is restricted to its owner.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{CustodyError, Result};
use crate::migration::{self, now_millis};
use crate::traits::SecretStore;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based secret store.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteSecretStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSecretStore {
    /// Open a keystore file at the given path.
    ///
    /// Creates the file (and its parent directory) and runs migrations if it
    /// doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = Connection::open(path)?;
        // other handles on the same file may hold the write lock briefly
        conn.busy_timeout(BUSY_TIMEOUT)?;
        restrict_permissions(path)?;
        migration::migrate(&mut conn)?;
        debug!(path = %path.display(), "opened keystore");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory keystore.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| CustodyError::Unavailable(format!("mutex poisoned: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| CustodyError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[async_trait]
impl SecretStore for SqliteSecretStore {
    async fn get(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let secret: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT secret FROM secrets WHERE storage_key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(secret.map(Zeroizing::new))
        })
        .await
    }

    async fn set(&self, key: &str, secret: &[u8]) -> Result<()> {
        let key = key.to_string();
        let secret = Zeroizing::new(secret.to_vec());
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO secrets (storage_key, secret, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(storage_key) DO UPDATE SET
                    secret = excluded.secret,
                    updated_at = excluded.updated_at",
                params![key, secret.as_slice(), now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn set_if_absent(&self, key: &str, secret: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let key = key.to_string();
        let secret = Zeroizing::new(secret.to_vec());
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO secrets (storage_key, secret, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(storage_key) DO NOTHING",
                params![key, secret.as_slice(), now_millis()],
            )?;
            let stored: Vec<u8> = conn.query_row(
                "SELECT secret FROM secrets WHERE storage_key = ?1",
                params![key],
                |row| row.get(0),
            )?;
            Ok(Zeroizing::new(stored))
        })
        .await
    }
}
