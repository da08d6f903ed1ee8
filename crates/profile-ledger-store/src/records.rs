//! Record storage for the document store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use profile_ledger_core::{Cid, DocId, Document};

use crate::error::{Result, StoreError};

/// A stored document together with the CID it was published under.
///
/// Records are created once and never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub doc_id: DocId,
    pub document: Document,
    pub cid: Cid,
}

/// Storage for store records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record. Fails if the document id is already taken.
    async fn insert(&self, record: StoreRecord) -> Result<()>;

    /// Get a record by document id.
    async fn get(&self, doc_id: &DocId) -> Result<Option<StoreRecord>>;

    /// Number of stored records.
    async fn len(&self) -> Result<usize>;
}

#[async_trait]
impl<R: RecordStore + ?Sized> RecordStore for Arc<R> {
    async fn insert(&self, record: StoreRecord) -> Result<()> {
        (**self).insert(record).await
    }

    async fn get(&self, doc_id: &DocId) -> Result<Option<StoreRecord>> {
        (**self).get(doc_id).await
    }

    async fn len(&self) -> Result<usize> {
        (**self).len().await
    }
}

/// In-memory record store.
///
/// Sharded, so concurrent inserts and lookups on different ids do not
/// contend on a single lock. All records are lost when the store is dropped.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: DashMap<DocId, StoreRecord>,
}

impl MemoryRecordStore {
    /// Create a new empty record store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: StoreRecord) -> Result<()> {
        match self.records.entry(record.doc_id) {
            Entry::Occupied(_) => Err(StoreError::Internal(format!(
                "document id {} already in use",
                record.doc_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, doc_id: &DocId) -> Result<Option<StoreRecord>> {
        Ok(self.records.get(doc_id).map(|entry| entry.value().clone()))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_ledger_core::PROFILE_KIND;

    fn record() -> StoreRecord {
        StoreRecord {
            doc_id: DocId::new_random(),
            document: Document {
                kind: PROFILE_KIND.into(),
                owner_id: "02ab".into(),
                name: "Alex".into(),
                bio: "hi".into(),
                avatar_cid: None,
                created_at: 1_700_000_000_000,
                signature: None,
            },
            cid: Cid::new("QmDoc"),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryRecordStore::new();
        let record = record();

        store.insert(record.clone()).await.unwrap();

        assert_eq!(store.get(&record.doc_id).await.unwrap(), Some(record));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryRecordStore::new();
        assert_eq!(store.get(&DocId::new_random()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected_and_original_kept() {
        let store = MemoryRecordStore::new();
        let original = record();
        let mut clash = record();
        clash.doc_id = original.doc_id;
        clash.cid = Cid::new("QmOther");

        store.insert(original.clone()).await.unwrap();
        assert!(store.insert(clash).await.is_err());
        assert_eq!(store.get(&original.doc_id).await.unwrap(), Some(original));
    }

    #[test]
    fn test_record_json_shape() {
        let value = serde_json::to_value(record()).unwrap();
        assert!(value.get("docId").is_some());
        assert_eq!(value["cid"], "QmDoc");
        assert_eq!(value["document"]["type"], "profile");
    }
}
