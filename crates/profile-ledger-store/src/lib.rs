//! # Profile Ledger Store
//!
//! The document store: accepts signed documents, publishes them to the
//! pinning network, and serves them back by an opaque document id.
//!
//! ## Overview
//!
//! - [`DocumentStore`]: the service. Publishing happens before the record is
//!   inserted, so a failed publish never leaves a record behind.
//! - [`RecordStore`]: where records live; [`MemoryRecordStore`] is a
//!   concurrent in-memory map whose lifetime is the process.
//! - [`router`]: the axum HTTP surface (`POST /store`, `GET /document/:id`).
//! - [`StoreClient`]: reqwest client for a remote store.
//! - [`DocumentSubmitter`]: the seam the registration flow submits through,
//!   implemented both in-process and over HTTP.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use profile_ledger_pin::MemoryPublisher;
//! use profile_ledger_store::{router, DocumentStore};
//!
//! let store = Arc::new(DocumentStore::new(MemoryPublisher::new()));
//! let app = router(store);
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod records;
pub mod service;

pub use client::StoreClient;
pub use error::{Result, StoreError};
pub use http::{router, MAX_BODY_BYTES};
pub use records::{MemoryRecordStore, RecordStore, StoreRecord};
pub use service::{DocumentResponse, DocumentStore, DocumentSubmitter, StoreConfig, SubmitReceipt};
