//! Movie metadata provider abstraction
//!
//! The metadata API is a black box returning structured records or failing. Keeping it behind a
//! trait lets the screens and the HTTP surface run against a mock in tests.

use crate::{
    error::AppResult,
    models::{Movie, MovieDetails},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Search movies by free-text query
    ///
    /// A blank query returns the provider's popular movies instead of an error.
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Fetch the full detail record for one movie
    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
