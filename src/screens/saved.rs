use serde::Serialize;

use super::MovieCard;
use crate::{error::AppResult, models::SavedMovie, services::SavedMovies};

#[derive(Debug, Clone, PartialEq)]
enum SavedState {
    Loading,
    Loaded(Vec<SavedMovie>),
    Failed(String),
}

/// Snapshot of everything the saved list screen renders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SavedView {
    pub loading: bool,
    pub error: Option<String>,
    pub movies: Vec<MovieCard>,
    /// Shown only when the list loaded and is genuinely empty
    pub empty_message: Option<&'static str>,
}

/// Saved list screen controller
pub struct SavedScreen {
    saved: SavedMovies,
    image_base_url: String,
    user_id: String,
    state: SavedState,
}

impl SavedScreen {
    pub fn new(saved: SavedMovies, image_base_url: String, user_id: String) -> Self {
        Self {
            saved,
            image_base_url,
            user_id,
            state: SavedState::Loading,
        }
    }

    /// (Re)loads the user's saved movies
    ///
    /// A failure is kept for the view and also returned.
    pub async fn refresh(&mut self) -> AppResult<()> {
        match self.saved.list(&self.user_id).await {
            Ok(movies) => {
                tracing::debug!(user_id = %self.user_id, saved = movies.len(), "Saved movies loaded");
                self.state = SavedState::Loaded(movies);
                Ok(())
            }
            Err(e) => {
                self.state = SavedState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn view(&self) -> SavedView {
        match &self.state {
            SavedState::Loading => SavedView {
                loading: true,
                error: None,
                movies: Vec::new(),
                empty_message: None,
            },
            SavedState::Loaded(movies) => SavedView {
                loading: false,
                error: None,
                movies: movies
                    .iter()
                    .map(|movie| MovieCard::from_saved(movie, &self.image_base_url))
                    .collect(),
                empty_message: movies.is_empty().then_some("No saved movies yet."),
            },
            SavedState::Failed(message) => SavedView {
                loading: false,
                error: Some(message.clone()),
                movies: Vec::new(),
                empty_message: None,
            },
        }
    }
}
