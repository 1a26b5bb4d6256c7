use thiserror::Error;

/// Failures of the document store backing the suggestions collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("store error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("querying stale suggestions failed: {0}")]
    Query(#[source] StoreError),

    #[error("committing delete batch {batch} of {batches} failed: {source}")]
    Commit {
        batch: usize,
        batches: usize,
        #[source]
        source: StoreError,
    },

    #[error("delete batch task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
