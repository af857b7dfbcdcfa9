use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Movie;

/// A movie a user has saved to their list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedMovie {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Stored as a string, matching the collection schema
    #[serde(rename = "movieId")]
    pub movie_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Field set written when a movie is saved
#[derive(Debug, Serialize)]
pub struct NewSavedMovie<'a> {
    #[serde(rename = "userId")]
    pub user_id: &'a str,
    #[serde(rename = "movieId")]
    pub movie_id: String,
    pub title: &'a str,
    pub poster_path: Option<&'a str>,
    pub vote_average: f64,
    pub release_date: Option<&'a str>,
}

impl<'a> NewSavedMovie<'a> {
    pub fn new(movie: &'a Movie, user_id: &'a str) -> Self {
        Self {
            user_id,
            movie_id: movie.id.to_string(),
            title: &movie.title,
            poster_path: movie.poster_path.as_deref(),
            vote_average: movie.vote_average,
            release_date: movie.release_date.as_deref(),
        }
    }
}

/// What a save toggle did to the record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Saved,
    Unsaved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    pub success: bool,
}

impl From<ToggleAction> for ToggleOutcome {
    fn from(action: ToggleAction) -> Self {
        Self {
            action,
            success: true,
        }
    }
}
