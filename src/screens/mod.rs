//! Headless screen controllers
//!
//! Each controller owns the state its screen renders and applies the same transitions a UI
//! would: debounced search, optimistic save toggles, list loading. A UI shell (or the HTTP
//! surface) drives them and renders their `view()` snapshots.

use serde::Serialize;

use crate::models::{poster_url, release_year, Movie, SavedMovie};

pub mod details;
pub mod saved;
pub mod search;

pub use details::{DetailScreen, DetailView};
pub use saved::{SavedScreen, SavedView};
pub use search::{SearchScreen, SearchView};

/// Placeholder rendered for any missing value
pub const NOT_AVAILABLE: &str = "N/A";

/// Grid card shared by the search results and the saved list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieCard {
    pub id: String,
    pub title: String,
    /// `None` renders as a placeholder image
    pub poster_url: Option<String>,
    pub vote_average: f64,
    pub release_year: String,
}

impl MovieCard {
    pub fn from_movie(movie: &Movie, image_base_url: &str) -> Self {
        Self {
            id: movie.id.to_string(),
            title: movie.title.clone(),
            poster_url: movie.poster_url(image_base_url),
            vote_average: movie.vote_average,
            release_year: or_not_available(movie.release_year()),
        }
    }

    pub fn from_saved(saved: &SavedMovie, image_base_url: &str) -> Self {
        Self {
            id: saved.movie_id.clone(),
            title: saved.title.clone(),
            poster_url: poster_url(image_base_url, saved.poster_path.as_deref()),
            vote_average: saved.vote_average,
            release_year: or_not_available(release_year(saved.release_date.as_deref())),
        }
    }
}

pub(crate) fn or_not_available(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::movie;

    #[test]
    fn test_card_from_movie() {
        let card = MovieCard::from_movie(&movie(550, "Fight Club"), "https://img");
        assert_eq!(card.id, "550");
        assert_eq!(card.poster_url.as_deref(), Some("https://img/550.jpg"));
        assert_eq!(card.release_year, "2005");
    }

    #[test]
    fn test_card_without_poster_or_date() {
        let mut bare = movie(1, "Untitled");
        bare.poster_path = None;
        bare.release_date = Some(String::new());

        let card = MovieCard::from_movie(&bare, "https://img");
        assert_eq!(card.poster_url, None);
        assert_eq!(card.release_year, NOT_AVAILABLE);
    }
}
