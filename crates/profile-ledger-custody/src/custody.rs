//! KeyCustody: get-or-create of the device signing keypair.

use tracing::{debug, info};

use profile_ledger_core::{random_secret, Keypair, PrivateKey};

use crate::error::Result;
use crate::traits::SecretStore;

/// Storage key under which the device secret is persisted.
pub const DEVICE_KEY_STORAGE_KEY: &str = "profile-ledger.device-key";

/// Owner of the device keypair.
///
/// At most one secret is ever persisted under the storage key: creation goes
/// through [`SecretStore::set_if_absent`], and every caller adopts whichever
/// secret the store kept. This holds across any number of `KeyCustody`
/// values over the same store.
pub struct KeyCustody<S: SecretStore> {
    store: S,
    storage_key: String,
}

impl<S: SecretStore> KeyCustody<S> {
    /// Create custody over `store` using the default storage key.
    pub fn new(store: S) -> Self {
        Self::with_storage_key(store, DEVICE_KEY_STORAGE_KEY)
    }

    /// Create custody over `store` using a custom storage key.
    pub fn with_storage_key(store: S, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
        }
    }

    /// Get the backing secret store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the keypair if one has been persisted; never creates.
    pub async fn get_keypair(&self) -> Result<Option<Keypair>> {
        let Some(secret) = self.store.get(&self.storage_key).await? else {
            return Ok(None);
        };
        let private_key = PrivateKey::from_bytes(&secret)?;
        Ok(Some(Keypair::from_private_key(private_key)))
    }

    /// Load the keypair, creating and persisting it on first use.
    pub async fn get_or_create_keypair(&self) -> Result<Keypair> {
        if let Some(keypair) = self.get_keypair().await? {
            return Ok(keypair);
        }

        let secret = random_secret();
        let stored = self
            .store
            .set_if_absent(&self.storage_key, secret.as_ref())
            .await?;
        let keypair = Keypair::from_private_key(PrivateKey::from_bytes(&stored)?);

        if stored.as_slice() == &secret[..] {
            info!(public_key = %keypair.public_key(), "created device keypair");
        } else {
            debug!(public_key = %keypair.public_key(), "device keypair created concurrently");
        }
        Ok(keypair)
    }
}
