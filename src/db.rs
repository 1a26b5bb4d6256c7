use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime, Document},
    error::Error as MongoError,
    Client, Collection, Database,
};

use crate::{
    error::StoreError,
    store::{DeleteBatch, SuggestionStore},
    types::{SuggestionRef, SuggestionStatus, ACCEPTED_AT_FIELD, STATUS_FIELD, SUGGESTIONS_COLLECTION},
};

/// `status == "accepted" AND acceptedAt < cutoff`.
/// documents whose `acceptedAt` is missing or not a date never match a date range.
pub fn stale_filter(cutoff: DateTime<Utc>) -> Document {
    doc! {
        STATUS_FIELD: SuggestionStatus::Accepted.as_str(),
        ACCEPTED_AT_FIELD: { "$lt": BsonDateTime::from_millis(cutoff.timestamp_millis()) },
    }
}

/// Handle to the suggestions database. Created once at startup; clones share the driver's pool.
#[derive(Clone)]
pub struct SuggestionsDB {
    client: Client,
    pub db: Database,
    atomic_batches: bool,
}

impl SuggestionsDB {
    pub async fn new(uri: &str, database: &str, atomic_batches: bool) -> Result<Self, MongoError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);

        Ok(Self { client, db, atomic_batches })
    }

    fn suggestions(&self) -> Collection<Document> {
        self.db.collection(SUGGESTIONS_COLLECTION)
    }

    async fn delete_in_transaction(&self, filter: Document) -> Result<u64, MongoError> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        match self.suggestions().delete_many(filter).session(&mut session).await {
            Ok(res) => {
                session.commit_transaction().await?;
                Ok(res.deleted_count)
            },
            Err(mongo_err) => {
                // abort now instead of on session drop
                if let Err(abort_err) = session.abort_transaction().await {
                    tracing::warn!(error = %abort_err, "failed to abort delete transaction");
                }
                Err(mongo_err)
            },
        }
    }
}

#[async_trait]
impl SuggestionStore for SuggestionsDB {
    async fn find_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<SuggestionRef>, StoreError> {
        let cursor = self.suggestions()
            .clone_with_type::<SuggestionRef>()
            .find(stale_filter(cutoff))
            .projection(doc! { "_id": 1 })
            .await?;

        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn commit_delete_batch(&self, batch: DeleteBatch) -> Result<u64, StoreError> {
        let filter = doc! { "_id": { "$in": batch.into_ids() } };

        let deleted = if self.atomic_batches {
            self.delete_in_transaction(filter).await?
        } else {
            self.suggestions().delete_many(filter).await?.deleted_count
        };

        Ok(deleted)
    }
}
