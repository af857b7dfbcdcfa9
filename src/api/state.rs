use std::{sync::Arc, time::Duration};

use crate::{
    config::{Config, StoreBackend},
    error::AppResult,
    screens::{DetailScreen, SavedScreen, SearchScreen},
    services::{
        providers::{MovieProvider, TmdbProvider},
        SavedMovies, SearchCounts,
    },
    store::{AppwriteStore, CollectionRef, DocumentStore, MemoryStore},
};

/// Collections the data access layer reads and writes
#[derive(Debug, Clone)]
pub struct Collections {
    pub search_counters: CollectionRef,
    pub saved_movies: CollectionRef,
}

impl Collections {
    pub fn from_config(config: &Config) -> Self {
        Self {
            search_counters: CollectionRef::new(
                &config.appwrite_database_id,
                &config.appwrite_collection_id,
            ),
            saved_movies: CollectionRef::new(
                &config.appwrite_database_id,
                &config.appwrite_save_collection_id,
            ),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MovieProvider>,
    pub search_counts: SearchCounts,
    pub saved_movies: SavedMovies,
    pub image_base_url: String,
    pub search_debounce: Duration,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        store: Arc<dyn DocumentStore>,
        collections: Collections,
        image_base_url: String,
        search_debounce: Duration,
    ) -> Self {
        Self {
            provider,
            search_counts: SearchCounts::new(
                store.clone(),
                collections.search_counters,
                image_base_url.clone(),
            ),
            saved_movies: SavedMovies::new(store, collections.saved_movies),
            image_base_url,
            search_debounce,
        }
    }

    /// Wires the TMDB provider and the configured document store
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Appwrite => Arc::new(AppwriteStore::new(
                config.appwrite_endpoint.clone(),
                config.appwrite_project_id.clone(),
                config.appwrite_api_key.clone(),
            )),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };

        let provider = Arc::new(TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        ));

        tracing::info!(
            store = store.name(),
            provider = provider.name(),
            "Application state initialized"
        );

        Self::new(
            provider,
            store,
            Collections::from_config(config),
            config.tmdb_image_url.clone(),
            config.search_debounce(),
        )
    }

    /// A fresh search screen bound to this state's provider and counters
    pub fn search_screen(&self) -> SearchScreen {
        SearchScreen::new(
            self.provider.clone(),
            self.search_counts.clone(),
            self.image_base_url.clone(),
            self.search_debounce,
        )
    }

    pub async fn detail_screen(&self, movie_id: u64, user_id: &str) -> AppResult<DetailScreen> {
        DetailScreen::load(
            self.provider.clone(),
            self.saved_movies.clone(),
            self.image_base_url.clone(),
            movie_id,
            user_id.to_string(),
        )
        .await
    }

    pub fn saved_screen(&self, user_id: &str) -> SavedScreen {
        SavedScreen::new(
            self.saved_movies.clone(),
            self.image_base_url.clone(),
            user_id.to_string(),
        )
    }
}
