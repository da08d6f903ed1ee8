//! In-memory implementation of the SecretStore trait.
//!
//! This is primarily for testing. Secrets live for the lifetime of the store
//! and are wiped when dropped. The store can be switched into a locked state
//! in which every call fails with [`CustodyError::Unavailable`], mirroring a
//! platform keystore that is locked or unsupported.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use zeroize::Zeroizing;

use crate::error::{CustodyError, Result};
use crate::traits::SecretStore;

/// In-memory secret store.
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, Zeroizing<Vec<u8>>>>,
    locked: AtomicBool,
    writes: AtomicUsize,
}

impl MemorySecretStore {
    /// Create a new empty, unlocked store.
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
            locked: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Create a store that starts out locked.
    pub fn locked() -> Self {
        let store = Self::new();
        store.lock();
        store
    }

    /// Make every subsequent call fail as unavailable.
    pub fn lock(&self) {
        self.locked.store(true, Ordering::SeqCst);
    }

    /// Undo [`lock`](Self::lock).
    pub fn unlock(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }

    /// Number of values written so far, by `set` or by a `set_if_absent`
    /// that created its key.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_unlocked(&self) -> Result<()> {
        if self.locked.load(Ordering::SeqCst) {
            return Err(CustodyError::Unavailable("secret store is locked".into()));
        }
        Ok(())
    }
}

impl Default for MemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
        self.check_unlocked()?;
        let secrets = self.secrets.read().await;
        Ok(secrets.get(key).cloned())
    }

    async fn set(&self, key: &str, secret: &[u8]) -> Result<()> {
        self.check_unlocked()?;
        let mut secrets = self.secrets.write().await;
        secrets.insert(key.to_string(), Zeroizing::new(secret.to_vec()));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, secret: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        self.check_unlocked()?;
        let mut secrets = self.secrets.write().await;
        let stored = secrets.entry(key.to_string()).or_insert_with(|| {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Zeroizing::new(secret.to_vec())
        });
        Ok(stored.clone())
    }
}
