//! In-memory implementation of the Publisher trait.
//!
//! This is primarily for testing. Content identifiers are derived from the
//! SHA-256 of the pinned bytes, so identical content deduplicates to the same
//! CID, much like a real content-addressed network. The publisher can be told
//! to fail every call with a chosen error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde_json::Value;

use profile_ledger_core::{canonical_json_bytes, digest, Cid};

use crate::error::{PublishError, Result};
use crate::traits::{PinResult, Publisher};

/// Mime type recorded for JSON pins.
const JSON_MIME: &str = "application/json";

/// Something pinned to a [`MemoryPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedContent {
    pub bytes: Bytes,
    pub mime_type: String,
    pub filename: Option<String>,
}

impl PinnedContent {
    /// Decode the content as JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.bytes).ok()
    }
}

/// In-memory pinning network.
pub struct MemoryPublisher {
    pinned: Mutex<HashMap<Cid, PinnedContent>>,
    failure: Mutex<Option<PublishError>>,
    calls: AtomicUsize,
}

impl MemoryPublisher {
    /// Create a new empty publisher that accepts everything.
    pub fn new() -> Self {
        Self {
            pinned: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every subsequent call with `error`.
    pub fn fail_with(&self, error: PublishError) {
        *lock(&self.failure) = Some(error);
    }

    /// Accept calls again after [`fail_with`](Self::fail_with).
    pub fn succeed(&self) {
        *lock(&self.failure) = None;
    }

    /// Look up pinned content by CID.
    pub fn get(&self, cid: &Cid) -> Option<PinnedContent> {
        lock(&self.pinned).get(cid).cloned()
    }

    /// Number of distinct pinned contents.
    pub fn pinned_count(&self) -> usize {
        lock(&self.pinned).len()
    }

    /// Number of publish calls received, successful or not.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn pin(&self, content: PinnedContent) -> Result<PinResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.failure).clone() {
            return Err(error);
        }

        let content_id = content_id_for(&content.bytes);
        let size_bytes = content.bytes.len() as u64;
        lock(&self.pinned).insert(content_id.clone(), content);

        Ok(PinResult {
            content_id,
            size_bytes,
            pinned_at: Utc::now(),
        })
    }
}

impl Default for MemoryPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish_json(&self, payload: &Value) -> Result<PinResult> {
        let bytes =
            canonical_json_bytes(payload).map_err(|e| PublishError::InvalidRequest(e.to_string()))?;
        self.pin(PinnedContent {
            bytes: Bytes::from(bytes),
            mime_type: JSON_MIME.to_string(),
            filename: None,
        })
    }

    async fn publish_file(
        &self,
        bytes: Bytes,
        mime_type: &str,
        filename: &str,
    ) -> Result<PinResult> {
        self.pin(PinnedContent {
            bytes,
            mime_type: mime_type.to_string(),
            filename: Some(filename.to_string()),
        })
    }
}

/// Derive the CID the memory network assigns to `bytes`.
pub fn content_id_for(bytes: &[u8]) -> Cid {
    Cid::new(format!("mem-{}", digest(bytes).to_hex()))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
