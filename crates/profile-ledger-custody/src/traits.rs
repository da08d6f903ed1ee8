//! SecretStore trait: the abstract interface to a device credential store.
//!
//! The platform store is assumed to protect confidentiality and integrity;
//! this trait only moves bytes in and out under a string key.

use std::sync::Arc;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::error::Result;

/// Async interface to a device-scoped secret store.
///
/// Implementations must be thread-safe. `set` overwrites any existing value;
/// `set_if_absent` is create-only and must be atomic with respect to every
/// other caller of the same store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Read the secret stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>>;

    /// Store `secret` under `key`.
    async fn set(&self, key: &str, secret: &[u8]) -> Result<()>;

    /// Store `secret` under `key` unless a value is already present.
    ///
    /// Returns the value persisted under `key` afterwards: `secret` if this
    /// call created it, otherwise the value some earlier caller stored.
    async fn set_if_absent(&self, key: &str, secret: &[u8]) -> Result<Zeroizing<Vec<u8>>>;
}

#[async_trait]
impl<S: SecretStore + ?Sized> SecretStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, secret: &[u8]) -> Result<()> {
        (**self).set(key, secret).await
    }

    async fn set_if_absent(&self, key: &str, secret: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        (**self).set_if_absent(key, secret).await
    }
}
