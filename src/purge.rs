use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::try_join_all;
use tracing::info;

use crate::{
    error::PurgeError,
    store::{DeleteBatch, SuggestionStore, MAX_BATCH_SIZE},
    types::SuggestionRef,
};

/// accepted suggestions older than this are deleted
pub const STALE_AFTER_DAYS: i64 = 7;

pub fn cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(STALE_AFTER_DAYS)
}

/// Splits refs into consecutive batches of at most [`MAX_BATCH_SIZE`].
/// An empty input yields no batches, and a multiple of the batch size leaves no empty tail.
pub fn partition(refs: Vec<SuggestionRef>) -> Vec<DeleteBatch> {
    refs.chunks(MAX_BATCH_SIZE)
        .filter_map(|chunk| DeleteBatch::new(chunk.to_vec()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PurgeReport {
    /// suggestions selected for deletion
    pub matched: usize,
    pub batches: usize,
    /// deletions the store confirmed across all committed batches
    pub deleted: u64,
}

#[derive(Clone)]
pub struct Purger {
    store: Arc<dyn SuggestionStore>,
}

impl Purger {
    pub fn new(store: Arc<dyn SuggestionStore>) -> Self {
        Self { store }
    }

    pub async fn run(&self) -> Result<PurgeReport, PurgeError> {
        self.run_at(Utc::now()).await
    }

    /// Deletes accepted suggestions whose `acceptedAt` is more than [`STALE_AFTER_DAYS`] before `now`.
    ///
    /// Every batch is committed on its own task and all of them are awaited together.
    /// The first failing commit is returned; batches that already committed stay deleted.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<PurgeReport, PurgeError> {
        let cutoff = cutoff(now);

        let stale = self.store.find_stale(cutoff).await.map_err(PurgeError::Query)?;
        let matched = stale.len();

        info!(matched, cutoff = %cutoff, "found {} suggestions to delete", matched);

        let batches = partition(stale);
        let total = batches.len();

        // dropping a JoinHandle detaches its task, so the other commits still run to completion
        // after the first failure surfaces
        let commits = batches.into_iter().enumerate().map(|(i, batch)| {
            let store = self.store.clone();
            let handle = tokio::spawn(async move { store.commit_delete_batch(batch).await });

            async move {
                match handle.await {
                    Ok(committed) => committed.map_err(|source| PurgeError::Commit {
                        batch: i + 1,
                        batches: total,
                        source,
                    }),
                    Err(join_err) => Err(PurgeError::Join(join_err)),
                }
            }
        });

        let deleted: u64 = try_join_all(commits).await?.into_iter().sum();

        info!(matched, deleted, batches = total, "successfully deleted {} old accepted suggestions", deleted);

        Ok(PurgeReport { matched, batches: total, deleted })
    }
}
