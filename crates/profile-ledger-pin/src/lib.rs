//! # Profile Ledger Pin
//!
//! Content publishing to a content-addressed pinning network.
//!
//! ## Overview
//!
//! The [`Publisher`] trait uploads JSON documents and binary files and returns
//! a [`PinResult`] carrying the content identifier. [`PinataClient`] talks to
//! the Pinata HTTP API; [`MemoryPublisher`] is a deterministic in-process
//! pinning network for tests.
//!
//! ## Design Notes
//!
//! - **Stateless client**: no caching; identical calls re-upload, and CID
//!   stability for identical bytes is left to the network's deduplication.
//! - **No retry**: transport failures surface as
//!   [`PublishError::Unavailable`], non-success responses as
//!   [`PublishError::Rejected`] with the response body preserved.

pub mod error;
pub mod memory;
pub mod pinata;
pub mod traits;

pub use error::{PublishError, Result};
pub use memory::{MemoryPublisher, PinnedContent};
pub use pinata::{PinataClient, PinataConfig};
pub use traits::{PinResult, Publisher, PublisherExt};
