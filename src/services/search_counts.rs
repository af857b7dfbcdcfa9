use serde_json::json;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Movie, NewSearchCounter, SearchCounter},
    services::locks::KeyedLocks,
    store::{to_fields, unique_id, CollectionRef, DocumentStore, Fields, Query},
};

/// Number of counters returned by `trending_movies`
pub const TRENDING_LIMIT: usize = 5;

/// Search-term usage counters
#[derive(Clone)]
pub struct SearchCounts {
    store: Arc<dyn DocumentStore>,
    collection: CollectionRef,
    image_base_url: String,
    locks: Arc<KeyedLocks>,
}

impl SearchCounts {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: CollectionRef,
        image_base_url: String,
    ) -> Self {
        Self {
            store,
            collection,
            image_base_url,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Records a submission of `query`, seeding a new counter from `movie` on first use
    ///
    /// Submissions of the same term are serialized in-process so the read-then-write below never
    /// creates two counters for one term.
    pub async fn update_search_count(&self, query: &str, movie: &Movie) -> AppResult<SearchCounter> {
        let _guard = self.locks.lock(query).await;

        let result = self.increment_or_create(query, movie).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, query = %query, "Error updating search count");
        }
        result
    }

    async fn increment_or_create(&self, query: &str, movie: &Movie) -> AppResult<SearchCounter> {
        let existing = self
            .store
            .list_documents(&self.collection, &[Query::equal("searchTerm", query)])
            .await?;

        match existing.into_iter().next() {
            Some(document) => {
                let counter: SearchCounter = document.decode()?;
                let mut fields = Fields::new();
                fields.insert("count".to_string(), json!(counter.count + 1));

                let updated: SearchCounter = self
                    .store
                    .update_document(&self.collection, &counter.id, fields)
                    .await?
                    .decode()?;

                tracing::info!(query = %query, count = updated.count, "Search count incremented");
                Ok(updated)
            }
            None => {
                let fields = to_fields(&NewSearchCounter::new(query, movie, &self.image_base_url))?;
                let created: SearchCounter = self
                    .store
                    .create_document(&self.collection, &unique_id(), fields)
                    .await?
                    .decode()?;

                tracing::info!(query = %query, movie_id = movie.id, "Search counter created");
                Ok(created)
            }
        }
    }

    /// Most submitted search terms, highest count first
    pub async fn trending_movies(&self) -> AppResult<Vec<SearchCounter>> {
        let result = self.list_trending().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Error fetching trending movies");
        }
        result
    }

    async fn list_trending(&self) -> AppResult<Vec<SearchCounter>> {
        self.store
            .list_documents(
                &self.collection,
                &[Query::limit(TRENDING_LIMIT), Query::order_desc("count")],
            )
            .await?
            .into_iter()
            .map(|document| document.decode())
            .collect()
    }
}
