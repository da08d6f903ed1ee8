//! Publisher trait: the abstract interface to a pinning network.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use profile_ledger_core::{to_canonical_value, Cid};

use crate::error::{PublishError, Result};

/// Outcome of one successful publish call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinResult {
    /// Content identifier assigned by the network.
    pub content_id: Cid,
    /// Size of the pinned content as reported by the network.
    pub size_bytes: u64,
    /// When the network pinned the content.
    pub pinned_at: DateTime<Utc>,
}

/// Async interface to a content-addressed pinning network.
///
/// Both calls are single network round trips: no retry, no caching.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Pin a JSON payload.
    async fn publish_json(&self, payload: &Value) -> Result<PinResult>;

    /// Pin a binary blob as a file upload.
    async fn publish_file(&self, bytes: Bytes, mime_type: &str, filename: &str)
        -> Result<PinResult>;
}

#[async_trait]
impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    async fn publish_json(&self, payload: &Value) -> Result<PinResult> {
        (**self).publish_json(payload).await
    }

    async fn publish_file(
        &self,
        bytes: Bytes,
        mime_type: &str,
        filename: &str,
    ) -> Result<PinResult> {
        (**self).publish_file(bytes, mime_type, filename).await
    }
}

/// Extension trait for publishing typed documents.
pub trait PublisherExt: Publisher {
    /// Serialize `document` to its canonical JSON value and pin it.
    fn publish_document<T: Serialize + Sync + ?Sized>(
        &self,
        document: &T,
    ) -> impl Future<Output = Result<PinResult>> + Send;
}

impl<P: Publisher + ?Sized> PublisherExt for P {
    async fn publish_document<T: Serialize + Sync + ?Sized>(
        &self,
        document: &T,
    ) -> Result<PinResult> {
        let value =
            to_canonical_value(document).map_err(|e| PublishError::InvalidRequest(e.to_string()))?;
        self.publish_json(&value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPublisher;
    use serde_json::json;

    #[derive(Serialize)]
    struct Note {
        title: &'static str,
        body: &'static str,
    }

    #[tokio::test]
    async fn test_publish_document_pins_canonical_value() {
        let publisher = MemoryPublisher::new();
        let note = Note {
            title: "t",
            body: "b",
        };

        let result = publisher.publish_document(&note).await.unwrap();
        let pinned = publisher.get(&result.content_id).unwrap();

        assert_eq!(pinned.json(), Some(json!({"body": "b", "title": "t"})));
        assert_eq!(&pinned.bytes[..], br#"{"body":"b","title":"t"}"#);
    }

    #[tokio::test]
    async fn test_arc_publisher_delegates() {
        let inner = Arc::new(MemoryPublisher::new());
        let shared: Arc<dyn Publisher> = inner.clone();

        shared.publish_json(&json!({"a": 1})).await.unwrap();
        shared
            .publish_file(Bytes::from_static(b"x"), "text/plain", "x.txt")
            .await
            .unwrap();

        assert_eq!(inner.call_count(), 2);
    }
}
