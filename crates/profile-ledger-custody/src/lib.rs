//! # Profile Ledger Custody
//!
//! Custody of the device signing key. Provides the [`SecretStore`] abstraction
//! over a platform credential store, with SQLite and in-memory backends, and
//! [`KeyCustody`], which creates the device keypair exactly once and hands it
//! out afterwards.
//!
//! ## Key Types
//!
//! - [`SecretStore`] - The async trait for `get(key)` / `set(key, secret)`
//! - [`SqliteSecretStore`] - SQLite-backed keystore file (mode `0600` on Unix)
//! - [`MemorySecretStore`] - In-memory keystore for tests, can simulate a locked store
//! - [`KeyCustody`] - Get-or-create of the device keypair
//!
//! ## Usage
//!
//! ```rust,no_run
//! use profile_ledger_custody::{KeyCustody, SqliteSecretStore};
//!
//! async fn example() {
//!     let store = SqliteSecretStore::open("keystore.db").unwrap();
//!     let custody = KeyCustody::new(store);
//!
//!     // First call creates and persists the key; later calls load it.
//!     let keypair = custody.get_or_create_keypair().await.unwrap();
//!     println!("ownerId = {}", keypair.public_key());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Single secret**: creation is a check-then-act guarded by an async mutex
//!   with a re-check under the lock, so concurrent first calls persist one key.
//! - **No exposure**: the private key leaves this crate only inside a
//!   [`Keypair`](profile_ledger_core::Keypair); it is never logged.

pub mod custody;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use custody::{KeyCustody, DEVICE_KEY_STORAGE_KEY};
pub use error::{CustodyError, Result};
pub use memory::MemorySecretStore;
pub use sqlite::SqliteSecretStore;
pub use traits::SecretStore;
