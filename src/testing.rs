//! Shared fixtures for unit tests

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieDetails},
    services::providers::MovieProvider,
    store::{CollectionRef, Document, DocumentStore, Fields, Query},
};

pub fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/{}.jpg", id)),
        vote_average: 7.0,
        release_date: Some("2005-06-10".to_string()),
    }
}

pub fn details(id: u64, title: &str) -> MovieDetails {
    MovieDetails {
        movie: movie(id, title),
        overview: Some(format!("{} overview", title)),
        runtime: Some(120),
        genres: Vec::new(),
        budget: 0,
        revenue: 0,
        production_companies: Vec::new(),
        vote_count: 100,
    }
}

/// Store whose every call fails, as when the backend is unreachable
pub struct UnavailableStore;

fn unavailable() -> AppError {
    AppError::Store("service unavailable".to_string())
}

#[async_trait::async_trait]
impl DocumentStore for UnavailableStore {
    async fn list_documents(&self, _: &CollectionRef, _: &[Query]) -> AppResult<Vec<Document>> {
        Err(unavailable())
    }

    async fn create_document(&self, _: &CollectionRef, _: &str, _: Fields) -> AppResult<Document> {
        Err(unavailable())
    }

    async fn update_document(&self, _: &CollectionRef, _: &str, _: Fields) -> AppResult<Document> {
        Err(unavailable())
    }

    async fn delete_document(&self, _: &CollectionRef, _: &str) -> AppResult<()> {
        Err(unavailable())
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

#[derive(Clone)]
enum Scripted {
    Movies(Vec<Movie>, Duration),
    Failure(String),
}

/// Provider with per-query canned responses and latencies that records every search it serves
///
/// Unscripted queries return no movies immediately.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    responses: Arc<Mutex<HashMap<String, Scripted>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, query: &str, movies: Vec<Movie>) -> Self {
        self.respond_after(query, movies, Duration::ZERO)
    }

    pub fn respond_after(self, query: &str, movies: Vec<Movie>, latency: Duration) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), Scripted::Movies(movies, latency));
        self
    }

    pub fn fail(self, query: &str, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), Scripted::Failure(message.to_string()));
        self
    }

    /// Queries searched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MovieProvider for ScriptedProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        self.calls.lock().unwrap().push(query.to_string());
        let scripted = self.responses.lock().unwrap().get(query).cloned();

        match scripted {
            Some(Scripted::Movies(movies, latency)) => {
                if !latency.is_zero() {
                    tokio::time::sleep(latency).await;
                }
                Ok(movies)
            }
            Some(Scripted::Failure(message)) => Err(AppError::ExternalApi(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails> {
        Err(AppError::NotFound(format!("movie {}", movie_id)))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
