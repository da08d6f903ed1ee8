//! # Profile Ledger Testkit
//!
//! Testing utilities for Profile Ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: secp256k1 key derivation, SHA-256 and signing
//!   payload bytes that every implementation must reproduce
//! - **Generators**: Proptest strategies for documents and keys
//! - **Fixtures**: A seeded device key wired to in-memory backends
//!
//! ## Golden Vectors
//!
//! ```rust
//! use profile_ledger_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use profile_ledger_testkit::generators::{document_from_params, DocumentParams};
//!
//! proptest! {
//!     #[test]
//!     fn signed_documents_verify(params: DocumentParams) {
//!         let doc = document_from_params(&params);
//!         prop_assert!(profile_ledger_core::verify_document(&doc));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use profile_ledger_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let doc = fixture.profile("Alex", "hi");
//! assert_eq!(doc.owner_id, fixture.public_key().to_hex());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, sample_document, TestFixture, DEFAULT_SEED};
pub use generators::{document_from_params, DocumentParams};
pub use vectors::{digest_vectors, key_vectors, payload_vectors, verify_all_vectors};
