//! # Profile Ledger Core
//!
//! Pure primitives for Profile Ledger: device keypairs, signatures, signed
//! documents, and canonicalization.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Keypair`] - A secp256k1 signing keypair (private key + compressed public key)
//! - [`Document`] - A user-authored document, optionally signed by its owner
//! - [`DocId`] - Opaque identifier minted by the document store per submission
//! - [`Cid`] - Content identifier returned by the pinning network
//!
//! ## Canonicalization
//!
//! Signatures cover the compact JSON encoding of `{name, bio, avatarCid}` in
//! that exact key order. See the [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod document;
pub mod error;
pub mod types;

pub use canonical::{canonical_json_bytes, signing_payload, to_canonical_value};
pub use crypto::{
    digest, random_secret, sign, verify, Keypair, PrivateKey, PublicKey, Sha256Digest, Signature,
};
pub use document::{verify_document, Document, DocumentBuilder, CONTENT_URI_SCHEME, PROFILE_KIND};
pub use error::{CoreError, Result};
pub use types::{Cid, DocId};
