use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Movie, SearchCounter},
    services::{providers::MovieProvider, SearchCounts},
};

/// Result of an explicit search submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedSearch {
    pub movies: Vec<Movie>,
    /// Counter recorded for the submitted term; `None` when nothing matched
    pub counter: Option<SearchCounter>,
}

/// Movie listing for a free-text query; blank means popular movies
pub async fn search_movies(provider: Arc<dyn MovieProvider>, query: &str) -> AppResult<Vec<Movie>> {
    provider.search_movies(query).await
}

/// Fetches `query` and, when anything matched, records a usage counter seeded from the first
/// result
///
/// The term is trimmed before fetching and counting. A failed counter write fails the whole
/// submission.
pub async fn submit_search(
    provider: &dyn MovieProvider,
    counts: &SearchCounts,
    query: &str,
) -> AppResult<SubmittedSearch> {
    let query = query.trim();
    let movies = provider.search_movies(query).await?;

    let counter = match movies.first() {
        Some(first) => Some(counts.update_search_count(query, first).await?),
        None => None,
    };

    tracing::info!(
        query = %query,
        results = movies.len(),
        recorded = counter.is_some(),
        "Search submitted"
    );

    Ok(SubmittedSearch { movies, counter })
}
