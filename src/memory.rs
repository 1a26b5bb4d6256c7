//! In-process stand-in for the suggestions collection.
//!
//! Mirrors the MongoDB query semantics the purger relies on, including type bracketing
//! on `acceptedAt`: a value that is missing or not a datetime never satisfies `$lt`.
//! Each commit is all-or-nothing. Failures can be injected for the query and for any
//! batch containing a poisoned id.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{Bson, DateTime as BsonDateTime, Document};
use tokio::sync::Mutex;

use crate::{
    error::StoreError,
    store::{DeleteBatch, SuggestionStore},
    types::{SuggestionRef, SuggestionStatus, ACCEPTED_AT_FIELD, STATUS_FIELD},
};

#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<Vec<Document>>,
    poisoned: Mutex<Vec<Bson>>,
    committed: Mutex<Vec<usize>>,
    fail_queries: AtomicBool,
}

fn is_stale(doc: &Document, cutoff: BsonDateTime) -> bool {
    let accepted = matches!(
        doc.get_str(STATUS_FIELD),
        Ok(status) if SuggestionStatus::from(status) == SuggestionStatus::Accepted
    );
    let expired = matches!(doc.get_datetime(ACCEPTED_AT_FIELD), Ok(at) if *at < cutoff);

    accepted && expired
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(docs: Vec<Document>) -> Self {
        Self { docs: Mutex::new(docs), ..Self::default() }
    }

    pub async fn insert(&self, doc: Document) {
        self.docs.lock().await.push(doc);
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.docs.lock().await.clone()
    }

    /// sizes of every successful commit, in completion order
    pub async fn committed_batch_sizes(&self) -> Vec<usize> {
        self.committed.lock().await.clone()
    }

    /// any batch containing `id` fails to commit and deletes nothing
    pub async fn poison(&self, id: impl Into<Bson>) {
        self.poisoned.lock().await.push(id.into());
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn find_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<SuggestionRef>, StoreError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("query rejected".to_string()));
        }

        let cutoff = BsonDateTime::from_millis(cutoff.timestamp_millis());

        Ok(
            self.docs.lock().await
                .iter()
                .filter(|doc| is_stale(doc, cutoff))
                .filter_map(|doc| doc.get("_id").cloned().map(SuggestionRef::new))
                .collect()
        )
    }

    async fn commit_delete_batch(&self, batch: DeleteBatch) -> Result<u64, StoreError> {
        {
            let poisoned = self.poisoned.lock().await;
            if let Some(bad) = batch.refs().iter().find(|r| poisoned.contains(&r.id)) {
                return Err(StoreError::Backend(format!("commit rejected for batch containing {}", bad.id)));
            }
        }

        let size = batch.len();
        let ids = batch.into_ids();

        let mut docs = self.docs.lock().await;
        let before = docs.len();
        docs.retain(|doc| !doc.get("_id").is_some_and(|id| ids.contains(id)));
        let deleted = (before - docs.len()) as u64;
        drop(docs);

        self.committed.lock().await.push(size);

        Ok(deleted)
    }
}
