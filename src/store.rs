use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::Bson;

use crate::{error::StoreError, types::SuggestionRef};

/// max number of operations the store accepts in one atomic commit
pub const MAX_BATCH_SIZE: usize = 500;

/// A group of deletes committed together. Never empty, never more than [`MAX_BATCH_SIZE`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteBatch {
    refs: Vec<SuggestionRef>,
}

impl DeleteBatch {
    /// returns `None` for an empty or oversized group
    pub fn new(refs: Vec<SuggestionRef>) -> Option<Self> {
        if refs.is_empty() || refs.len() > MAX_BATCH_SIZE {
            return None;
        }
        Some(Self { refs })
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn refs(&self) -> &[SuggestionRef] {
        &self.refs
    }

    pub fn into_ids(self) -> Vec<Bson> {
        self.refs.into_iter().map(|r| r.id).collect()
    }
}

#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// refs of every suggestion with `status == "accepted"` and `acceptedAt < cutoff`
    async fn find_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<SuggestionRef>, StoreError>;

    /// deletes every record in `batch` as one unit, returning how many the store removed
    async fn commit_delete_batch(&self, batch: DeleteBatch) -> Result<u64, StoreError>;
}
