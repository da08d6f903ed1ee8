//! # Profile Ledger
//!
//! Device-signed profile registration backed by a content-addressed pinning
//! network and a document store.
//!
//! ## Overview
//!
//! A profile is saved in four steps:
//!
//! 1. The device keypair is loaded from custody, or created on first use.
//! 2. An optional avatar is pinned and referenced as `ipfs://<cid>`.
//! 3. The profile document is signed over its `{name, bio, avatarCid}`
//!    subset.
//! 4. The signed document is submitted to the document store, which pins it
//!    and answers with a document id.
//!
//! [`ProfileRegistrationFlow`] runs these steps; [`config`] loads the
//! process configuration from the environment.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use profile_ledger::{ProfileInput, ProfileRegistrationFlow};
//! use profile_ledger::custody::{KeyCustody, MemorySecretStore};
//! use profile_ledger::pin::MemoryPublisher;
//! use profile_ledger::store::DocumentStore;
//!
//! async fn example() {
//!     let publisher = Arc::new(MemoryPublisher::new());
//!     let store = Arc::new(DocumentStore::new(Arc::clone(&publisher)));
//!     let flow = ProfileRegistrationFlow::new(
//!         KeyCustody::new(MemorySecretStore::new()),
//!         publisher,
//!         store,
//!     );
//!
//!     let saved = flow
//!         .save_profile(ProfileInput::new("Alex", "hi"))
//!         .await
//!         .unwrap();
//!     println!("{} -> {}", saved.doc_id, saved.cid);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `profile_ledger::core` - documents, identifiers, signing
//! - `profile_ledger::custody` - device key custody
//! - `profile_ledger::pin` - pinning network clients
//! - `profile_ledger::store` - document store service and client

pub mod config;
pub mod error;
pub mod flow;

// Re-export component crates
pub use profile_ledger_core as core;
pub use profile_ledger_custody as custody;
pub use profile_ledger_pin as pin;
pub use profile_ledger_store as store;

pub use config::{ClientConfig, FromEnv, ServerConfig};
pub use error::{ConfigError, FlowError, Result};
pub use flow::{AvatarSource, ProfileInput, ProfileRegistrationFlow, SavedProfile};

pub use profile_ledger_core::{verify_document, Cid, DocId, Document, Keypair, PublicKey};
