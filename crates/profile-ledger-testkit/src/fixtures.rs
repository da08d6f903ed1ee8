//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use profile_ledger_core::{Cid, Document, DocumentBuilder, Keypair, PublicKey, PROFILE_KIND};
use profile_ledger_custody::{KeyCustody, MemorySecretStore, SecretStore, DEVICE_KEY_STORAGE_KEY};
use profile_ledger_pin::MemoryPublisher;
use profile_ledger_store::{DocumentStore, StoreConfig};

/// Seed used by [`TestFixture::new`].
pub const DEFAULT_SEED: [u8; 32] = [0x42; 32];

/// Creation timestamp stamped on fixture documents.
pub const FIXTURE_CREATED_AT: i64 = 1_700_000_000_000;

/// A device key plus in-memory custody, pinning and store backends.
pub struct TestFixture {
    pub seed: [u8; 32],
    pub keypair: Keypair,
    pub secrets: Arc<MemorySecretStore>,
    pub publisher: Arc<MemoryPublisher>,
    pub store: Arc<DocumentStore<Arc<MemoryPublisher>>>,
}

impl TestFixture {
    /// Create a fixture with the default seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create with a deterministic keypair from seed.
    ///
    /// Panics if the seed is not a valid secp256k1 scalar.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_seed_and_config(seed, StoreConfig::default())
    }

    /// Create a fixture whose store runs with `config`.
    pub fn with_store_config(config: StoreConfig) -> Self {
        Self::with_seed_and_config(DEFAULT_SEED, config)
    }

    fn with_seed_and_config(seed: [u8; 32], config: StoreConfig) -> Self {
        let keypair = Keypair::from_seed(&seed).expect("fixture seed is not a valid scalar");
        let publisher = Arc::new(MemoryPublisher::new());
        let store = Arc::new(DocumentStore::with_config(Arc::clone(&publisher), config));
        Self {
            seed,
            keypair,
            secrets: Arc::new(MemorySecretStore::new()),
            publisher,
            store,
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> &PublicKey {
        self.keypair.public_key()
    }

    /// Store the fixture seed as the device key, so custody returns
    /// [`TestFixture::keypair`].
    pub async fn install_device_key(&self) -> profile_ledger_custody::Result<()> {
        self.secrets.set(DEVICE_KEY_STORAGE_KEY, &self.seed).await
    }

    /// Custody over the fixture's secret store.
    pub fn custody(&self) -> KeyCustody<Arc<MemorySecretStore>> {
        KeyCustody::new(Arc::clone(&self.secrets))
    }

    /// A signed profile owned by the fixture key.
    pub fn profile(&self, name: &str, bio: &str) -> Document {
        DocumentBuilder::profile(name, bio)
            .created_at(FIXTURE_CREATED_AT)
            .sign(&self.keypair)
            .expect("fixture signing failed")
    }

    /// A signed profile with an avatar.
    pub fn profile_with_avatar(&self, name: &str, bio: &str, avatar: &Cid) -> Document {
        DocumentBuilder::profile(name, bio)
            .avatar(avatar)
            .created_at(FIXTURE_CREATED_AT)
            .sign(&self.keypair)
            .expect("fixture signing failed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The unsigned profile document used in the store's HTTP examples.
pub fn sample_document() -> Document {
    Document {
        kind: PROFILE_KIND.to_string(),
        owner_id: "02ab".to_string(),
        name: "Alex".to_string(),
        bio: "hi".to_string(),
        avatar_cid: None,
        created_at: FIXTURE_CREATED_AT,
        signature: None,
    }
}

/// Create multiple test fixtures for multi-party tests.
///
/// Each party's seed carries its index in the low 8 bytes, so every count
/// yields distinct keys.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count as u64)
        .map(|i| {
            let mut seed = [0x01u8; 32];
            seed[24..].copy_from_slice(&(i + 1).to_be_bytes());
            TestFixture::with_seed(seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_ledger_core::verify_document;

    #[test]
    fn test_fixture_profile_is_signed_by_fixture_key() {
        let fixture = TestFixture::new();
        let doc = fixture.profile("Alex", "hi");

        assert_eq!(doc.owner_id, fixture.public_key().to_hex());
        assert!(verify_document(&doc));
    }

    #[tokio::test]
    async fn test_installed_device_key_is_fixture_key() {
        let fixture = TestFixture::new();
        fixture.install_device_key().await.unwrap();

        let keypair = fixture.custody().get_or_create_keypair().await.unwrap();
        assert_eq!(keypair.public_key(), fixture.public_key());
        assert_eq!(fixture.secrets.write_count(), 1);
    }

    #[tokio::test]
    async fn test_fixture_store_roundtrip() {
        let fixture = TestFixture::new();
        let receipt = fixture.store.submit(sample_document()).await.unwrap();
        let record = fixture.store.lookup(&receipt.doc_id).await.unwrap();
        assert_eq!(record.document, sample_document());
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_fixtures(3);

        let pks: Vec<_> = parties.iter().map(|p| *p.public_key()).collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
        assert_ne!(pks[0], pks[2]);
    }

    #[test]
    fn test_multi_party_beyond_one_byte_of_parties() {
        let parties = multi_party_fixtures(300);

        let distinct: std::collections::HashSet<String> =
            parties.iter().map(|p| p.public_key().to_hex()).collect();
        assert_eq!(distinct.len(), 300);
    }
}
