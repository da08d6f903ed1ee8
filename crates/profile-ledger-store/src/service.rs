//! The document store service.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use profile_ledger_core::{verify_document, Cid, DocId, Document};
use profile_ledger_pin::{Publisher, PublisherExt};

use crate::error::{Result, StoreError};
use crate::records::{MemoryRecordStore, RecordStore, StoreRecord};

/// Configuration for the document store.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Reject documents whose signature does not verify against `ownerId`.
    ///
    /// Off by default: the store accepts unsigned and foreign documents
    /// as-is.
    pub verify_signatures: bool,
}

/// Returned to the submitter of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub doc_id: DocId,
    pub cid: Cid,
}

/// Body of a successful document lookup over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub doc: Document,
    pub cid: Cid,
}

impl From<StoreRecord> for DocumentResponse {
    fn from(record: StoreRecord) -> Self {
        Self {
            doc: record.document,
            cid: record.cid,
        }
    }
}

/// The document store.
///
/// Owns its publisher and its records; share it between request handlers
/// behind an `Arc`.
pub struct DocumentStore<P> {
    publisher: P,
    records: Arc<dyn RecordStore>,
    config: StoreConfig,
}

impl<P: Publisher> DocumentStore<P> {
    /// Create a store with in-memory records and default configuration.
    pub fn new(publisher: P) -> Self {
        Self::with_config(publisher, StoreConfig::default())
    }

    /// Create a store with in-memory records.
    pub fn with_config(publisher: P, config: StoreConfig) -> Self {
        Self::with_records(publisher, Arc::new(MemoryRecordStore::new()), config)
    }

    /// Create a store over an existing record store.
    pub fn with_records(publisher: P, records: Arc<dyn RecordStore>, config: StoreConfig) -> Self {
        Self {
            publisher,
            records,
            config,
        }
    }

    /// Get the publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Get the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Publish a document and record it under a fresh document id.
    ///
    /// The record is inserted only after the publish succeeds.
    pub async fn submit(&self, document: Document) -> Result<SubmitReceipt> {
        if self.config.verify_signatures && !verify_document(&document) {
            warn!(owner_id = %document.owner_id, "rejecting document with invalid signature");
            return Err(StoreError::SignatureRejected);
        }

        let pinned = self.publisher.publish_document(&document).await?;

        let doc_id = DocId::new_random();
        let receipt = SubmitReceipt {
            doc_id,
            cid: pinned.content_id.clone(),
        };
        self.records
            .insert(StoreRecord {
                doc_id,
                document,
                cid: pinned.content_id,
            })
            .await?;

        info!(doc_id = %receipt.doc_id, cid = %receipt.cid, "stored document");
        Ok(receipt)
    }

    /// Look up a stored record.
    pub async fn lookup(&self, doc_id: &DocId) -> Result<StoreRecord> {
        let record = self.records.get(doc_id).await?;
        debug!(doc_id = %doc_id, found = record.is_some(), "lookup");
        record.ok_or(StoreError::NotFound)
    }

    /// Number of stored records.
    pub async fn len(&self) -> Result<usize> {
        self.records.len().await
    }
}

/// Something a signed document can be submitted to.
#[async_trait]
pub trait DocumentSubmitter: Send + Sync {
    /// Submit a document and return its receipt.
    async fn submit_document(&self, document: &Document) -> Result<SubmitReceipt>;
}

#[async_trait]
impl<P: Publisher> DocumentSubmitter for DocumentStore<P> {
    async fn submit_document(&self, document: &Document) -> Result<SubmitReceipt> {
        self.submit(document.clone()).await
    }
}

#[async_trait]
impl<D: DocumentSubmitter + ?Sized> DocumentSubmitter for Arc<D> {
    async fn submit_document(&self, document: &Document) -> Result<SubmitReceipt> {
        (**self).submit_document(document).await
    }
}
