use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Movie, NewSavedMovie, SavedMovie, ToggleAction, ToggleOutcome},
    services::locks::KeyedLocks,
    store::{to_fields, unique_id, CollectionRef, DocumentStore, Query},
};

/// Per-user saved movies
#[derive(Clone)]
pub struct SavedMovies {
    store: Arc<dyn DocumentStore>,
    collection: CollectionRef,
    locks: Arc<KeyedLocks>,
}

impl SavedMovies {
    pub fn new(store: Arc<dyn DocumentStore>, collection: CollectionRef) -> Self {
        Self {
            store,
            collection,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// The save record for (`movie_id`, `user_id`), if any
    pub async fn find(&self, movie_id: u64, user_id: &str) -> AppResult<Option<SavedMovie>> {
        let result = self.find_record(movie_id, user_id).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, movie_id = movie_id, user_id = %user_id, "Error checking saved movie");
        }
        result
    }

    async fn find_record(&self, movie_id: u64, user_id: &str) -> AppResult<Option<SavedMovie>> {
        self.store
            .list_documents(
                &self.collection,
                &[
                    Query::equal("movieId", movie_id.to_string()),
                    Query::equal("userId", user_id),
                ],
            )
            .await?
            .into_iter()
            .next()
            .map(|document| document.decode())
            .transpose()
    }

    /// Flips the saved status of `movie` for `user_id`
    ///
    /// Deletes the existing record or creates a new one. Toggles on the same (user, movie) pair
    /// are serialized, so concurrent calls alternate instead of racing on the existence check.
    pub async fn toggle(&self, movie: &Movie, user_id: &str) -> AppResult<ToggleOutcome> {
        let _guard = self.locks.lock(&format!("{}:{}", user_id, movie.id)).await;

        let result = self.toggle_record(movie, user_id).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, movie_id = movie.id, user_id = %user_id, "Error toggling save status");
        }
        result
    }

    async fn toggle_record(&self, movie: &Movie, user_id: &str) -> AppResult<ToggleOutcome> {
        let action = match self.find_record(movie.id, user_id).await? {
            Some(existing) => {
                self.store
                    .delete_document(&self.collection, &existing.id)
                    .await?;
                ToggleAction::Unsaved
            }
            None => {
                let fields = to_fields(&NewSavedMovie::new(movie, user_id))?;
                self.store
                    .create_document(&self.collection, &unique_id(), fields)
                    .await?;
                ToggleAction::Saved
            }
        };

        tracing::info!(movie_id = movie.id, user_id = %user_id, action = ?action, "Save status toggled");
        Ok(action.into())
    }

    /// All saved movies for `user_id`, most recently saved first
    ///
    /// An empty list means the user has saved nothing; a failed fetch is an error.
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<SavedMovie>> {
        let result = self.list_records(user_id).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, user_id = %user_id, "Error fetching saved movies");
        }
        result
    }

    async fn list_records(&self, user_id: &str) -> AppResult<Vec<SavedMovie>> {
        self.store
            .list_documents(
                &self.collection,
                &[
                    Query::equal("userId", user_id),
                    Query::order_desc("$createdAt"),
                ],
            )
            .await?
            .into_iter()
            .map(|document| document.decode())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::MemoryStore,
        testing::{movie, UnavailableStore},
    };

    fn saved(store: &MemoryStore) -> SavedMovies {
        SavedMovies::new(Arc::new(store.clone()), CollectionRef::new("db", "saved"))
    }

    #[tokio::test]
    async fn test_toggle_alternates_saved_and_unsaved() {
        let store = MemoryStore::new();
        let saved = saved(&store);
        let fight_club = movie(550, "Fight Club");

        let first = saved.toggle(&fight_club, "u1").await.unwrap();
        assert_eq!(first, ToggleOutcome::from(ToggleAction::Saved));
        assert!(saved.find(550, "u1").await.unwrap().is_some());

        let second = saved.toggle(&fight_club, "u1").await.unwrap();
        assert_eq!(second.action, ToggleAction::Unsaved);
        assert!(second.success);
        assert!(saved.find(550, "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_saves_are_scoped_per_user() {
        let store = MemoryStore::new();
        let saved = saved(&store);

        saved.toggle(&movie(550, "Fight Club"), "u1").await.unwrap();

        assert!(saved.find(550, "u2").await.unwrap().is_none());
        assert!(saved.list("u2").await.unwrap().is_empty());
        assert_eq!(saved.list("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_saved_record_copies_movie_fields() {
        let store = MemoryStore::new();
        let saved = saved(&store);

        saved.toggle(&movie(550, "Fight Club"), "u1").await.unwrap();
        let record = saved.find(550, "u1").await.unwrap().unwrap();

        assert_eq!(record.movie_id, "550");
        assert_eq!(record.title, "Fight Club");
        assert_eq!(record.poster_path.as_deref(), Some("/550.jpg"));
        assert_eq!(record.release_date.as_deref(), Some("2005-06-10"));
        assert!(record.created_at.is_some());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        let saved = saved(&store);

        for (id, title) in [(550, "Fight Club"), (603, "The Matrix"), (680, "Pulp Fiction")] {
            saved.toggle(&movie(id, title), "u1").await.unwrap();
        }

        let titles: Vec<String> = saved
            .list("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Pulp Fiction", "The Matrix", "Fight Club"]);
    }

    #[tokio::test]
    async fn test_list_empty_is_not_an_error() {
        let store = MemoryStore::new();
        assert_eq!(saved(&store).list("u1").await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn test_concurrent_toggles_leave_no_duplicates() {
        let store = MemoryStore::new();
        let saved = saved(&store);

        let mut tasks = Vec::new();
        for _ in 0..4 {
            let saved = saved.clone();
            tasks.push(tokio::spawn(async move {
                saved.toggle(&movie(550, "Fight Club"), "u1").await
            }));
        }

        let mut actions = Vec::new();
        for task in tasks {
            actions.push(task.await.unwrap().unwrap().action);
        }

        let saves = actions.iter().filter(|a| **a == ToggleAction::Saved).count();
        assert_eq!(saves, 2);
        assert!(saved.find(550, "u1").await.unwrap().is_none());
        assert!(store.is_empty(&CollectionRef::new("db", "saved")).await);
    }

    #[tokio::test]
    async fn test_failures_are_propagated() {
        let saved = SavedMovies::new(Arc::new(UnavailableStore), CollectionRef::new("db", "saved"));

        assert!(saved.find(550, "u1").await.is_err());
        assert!(saved.list("u1").await.is_err());
        assert!(saved.toggle(&movie(550, "Fight Club"), "u1").await.is_err());
    }
}
