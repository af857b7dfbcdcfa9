use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use super::{or_not_available, NOT_AVAILABLE};
use crate::{
    error::AppResult,
    models::{MovieDetails, ToggleOutcome},
    services::{providers::MovieProvider, SavedMovies},
};

/// Snapshot of everything the detail screen renders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailView {
    pub id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_year: String,
    pub runtime: String,
    /// Rounded vote average, e.g. `8/10`
    pub rating: String,
    pub vote_count: u64,
    pub overview: String,
    pub genres: String,
    pub budget: String,
    pub revenue: String,
    pub production_companies: String,
    pub is_saved: bool,
    pub save_label: &'static str,
    pub save_in_flight: bool,
}

impl DetailView {
    pub fn new(details: &MovieDetails, image_base_url: &str, is_saved: bool) -> Self {
        let movie = &details.movie;

        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: movie.poster_url(image_base_url),
            release_year: or_not_available(movie.release_year()),
            runtime: details
                .runtime
                .map_or_else(|| NOT_AVAILABLE.to_string(), |minutes| format!("{}m", minutes)),
            rating: format!("{}/10", movie.vote_average.round()),
            vote_count: details.vote_count,
            overview: or_not_available(details.overview.as_deref()),
            genres: join_names(details.genres.iter().map(|g| g.name.as_str())),
            budget: format!("${} million", details.budget as f64 / 1_000_000.0),
            revenue: format!(
                "${} million",
                (details.revenue as f64 / 1_000_000.0).round()
            ),
            production_companies: join_names(
                details.production_companies.iter().map(|c| c.name.as_str()),
            ),
            is_saved,
            save_label: if is_saved { "Unsave" } else { "Save" },
            save_in_flight: false,
        }
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names.collect::<Vec<_>>().join(" • ");
    or_not_available(Some(&joined))
}

/// Clears the in-flight flag however the toggle ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Movie detail screen controller
///
/// Loads one movie and whether the user saved it. Toggling flips the saved flag optimistically
/// once the write succeeds; the record is not re-read.
pub struct DetailScreen {
    saved: SavedMovies,
    image_base_url: String,
    user_id: String,
    movie: MovieDetails,
    is_saved: AtomicBool,
    save_in_flight: AtomicBool,
}

impl DetailScreen {
    /// Fetches the movie, then its saved status
    ///
    /// A failed saved-status check is logged and shown as "not saved".
    pub async fn load(
        provider: Arc<dyn MovieProvider>,
        saved: SavedMovies,
        image_base_url: String,
        movie_id: u64,
        user_id: String,
    ) -> AppResult<Self> {
        let movie = provider.movie_details(movie_id).await?;

        let is_saved = match saved.find(movie.movie.id, &user_id).await {
            Ok(record) => record.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, movie_id = movie_id, "Saved status unavailable, showing as unsaved");
                false
            }
        };

        Ok(Self {
            saved,
            image_base_url,
            user_id,
            movie,
            is_saved: AtomicBool::new(is_saved),
            save_in_flight: AtomicBool::new(false),
        })
    }

    pub fn movie(&self) -> &MovieDetails {
        &self.movie
    }

    pub fn is_saved(&self) -> bool {
        self.is_saved.load(Ordering::SeqCst)
    }

    pub fn is_save_in_flight(&self) -> bool {
        self.save_in_flight.load(Ordering::SeqCst)
    }

    /// Toggles the saved status; returns `Ok(None)` when a toggle is already in flight
    pub async fn toggle_save(&self) -> AppResult<Option<ToggleOutcome>> {
        if self
            .save_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(None);
        }
        let _in_flight = InFlight(&self.save_in_flight);

        match self.saved.toggle(&self.movie.movie, &self.user_id).await {
            Ok(outcome) => {
                self.is_saved.fetch_xor(true, Ordering::SeqCst);
                Ok(Some(outcome))
            }
            Err(e) => {
                tracing::error!(error = %e, movie_id = self.movie.movie.id, "Failed to toggle save status");
                Err(e)
            }
        }
    }

    pub fn view(&self) -> DetailView {
        let mut view = DetailView::new(&self.movie, &self.image_base_url, self.is_saved());
        view.save_in_flight = self.is_save_in_flight();
        view
    }
}
