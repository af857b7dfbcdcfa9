use serde::Serialize;
use std::{
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
    time::Duration,
};
use tokio::task::JoinHandle;

use super::MovieCard;
use crate::{
    error::AppResult,
    models::{Movie, SearchCounter},
    services::{providers::MovieProvider, search::submit_search, SearchCounts},
};

/// Shared, immutable result list; identity (`Arc::ptr_eq`) decides whether the display changed
pub type MovieList = Arc<[Movie]>;

/// The one empty list every cleared display points at
fn empty_movies() -> MovieList {
    static EMPTY: OnceLock<MovieList> = OnceLock::new();
    EMPTY.get_or_init(|| Arc::from(Vec::new())).clone()
}

fn into_list(movies: Vec<Movie>) -> MovieList {
    if movies.is_empty() {
        empty_movies()
    } else {
        Arc::from(movies)
    }
}

#[derive(Debug)]
struct SearchState {
    query: String,
    displayed: MovieList,
    loading: bool,
    error: Option<String>,
    /// Generation of the most recently issued fetch; completions tagged otherwise are stale
    generation: u64,
    last_successful_query: Option<String>,
    /// Bumped each time `displayed` is replaced
    revision: u64,
    /// Bumped by every keystroke and submission; only the timer armed by the latest one may fire
    keystroke: u64,
}

impl SearchState {
    fn new() -> Self {
        Self {
            query: String::new(),
            displayed: empty_movies(),
            loading: false,
            error: None,
            generation: 0,
            last_successful_query: None,
            revision: 0,
            keystroke: 0,
        }
    }

    /// Records new query text and returns the sequence number of the timer it arms
    fn edit(&mut self, text: String) -> u64 {
        self.query = text;
        self.keystroke += 1;
        self.keystroke
    }

    fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Clears results and invalidates any fetch still in flight
    fn reset(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.error = None;
        self.last_successful_query = None;
        self.display(empty_movies());
    }

    fn display(&mut self, movies: MovieList) {
        if !Arc::ptr_eq(&self.displayed, &movies) {
            self.displayed = movies;
            self.revision += 1;
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Reconciles a debounced fetch; returns false when the result was stale and dropped
    fn apply_fetch(&mut self, generation: u64, query: &str, result: AppResult<Vec<Movie>>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.loading = false;

        match result {
            Ok(movies) => {
                self.error = None;
                let fetched = into_list(movies);
                if !Arc::ptr_eq(&self.displayed, &fetched) {
                    self.display(fetched);
                    self.last_successful_query =
                        (!self.displayed.is_empty()).then(|| query.to_string());
                }
            }
            Err(e) => {
                if !self.displayed.is_empty() {
                    self.display(empty_movies());
                }
                self.last_successful_query = None;
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Reconciles an explicit submission; failures only clear the display
    fn apply_submission(&mut self, generation: u64, query: &str, movies: Option<Vec<Movie>>) {
        if !self.is_current(generation) {
            return;
        }
        self.loading = false;

        match movies {
            Some(movies) if !movies.is_empty() => {
                self.display(into_list(movies));
                self.last_successful_query = Some(query.to_string());
            }
            _ => {
                self.display(empty_movies());
                self.last_successful_query = None;
            }
        }
    }
}

fn lock(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Snapshot of everything the search screen renders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub movies: Vec<MovieCard>,
    /// "Search Results for ..." once results for a non-blank query are on screen
    pub heading: Option<String>,
    pub empty_message: Option<&'static str>,
}

/// Search screen controller
///
/// Every `set_query` restarts the debounce timer; only the text present when the timer elapses
/// is fetched. Each fetch is tagged with a generation and only the latest generation may touch
/// the display, so a slow response for an older query can never overwrite a newer one.
///
/// Must be used from within a tokio runtime.
pub struct SearchScreen {
    provider: Arc<dyn MovieProvider>,
    counts: SearchCounts,
    image_base_url: String,
    debounce: Duration,
    state: Arc<Mutex<SearchState>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SearchScreen {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        counts: SearchCounts,
        image_base_url: String,
        debounce: Duration,
    ) -> Self {
        Self {
            provider,
            counts,
            image_base_url,
            debounce,
            state: Arc::new(Mutex::new(SearchState::new())),
            pending: Mutex::new(None),
        }
    }

    /// Updates the query text and restarts the debounce timer
    ///
    /// Aborting the previous timer is best effort; a timer that already woke is stopped by the
    /// keystroke check in `on_debounce_elapsed` instead.
    pub fn set_query(&self, text: impl Into<String>) {
        let keystroke = lock(&self.state).edit(text.into());

        let provider = self.provider.clone();
        let state = self.state.clone();
        let delay = self.debounce;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Self::on_debounce_elapsed(provider, state, keystroke);
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(timer);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn on_debounce_elapsed(
        provider: Arc<dyn MovieProvider>,
        state: Arc<Mutex<SearchState>>,
        keystroke: u64,
    ) {
        let (query, generation) = {
            let mut state = lock(&state);
            if state.keystroke != keystroke {
                return;
            }
            if state.query.trim().is_empty() {
                state.reset();
                return;
            }
            (state.query.clone(), state.begin_fetch())
        };

        tracing::debug!(query = %query, generation = generation, "Debounced search fired");

        tokio::spawn(async move {
            let result = provider.search_movies(&query).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, query = %query, "Search fetch failed");
            }

            if !lock(&state).apply_fetch(generation, &query, result) {
                tracing::debug!(query = %query, generation = generation, "Discarded stale search result");
            }
        });
    }

    fn cancel_pending(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(timer) = pending {
            timer.abort();
        }
    }

    /// Explicit submission (enter key)
    ///
    /// Fast-forwards the debounce: the pending timer is cancelled and the current text is fetched
    /// immediately. When anything matches, a usage counter is recorded for the typed term before
    /// the results are displayed. Empty results and failures clear the display; failures are
    /// also returned.
    pub async fn submit(&self) -> AppResult<Option<SearchCounter>> {
        self.cancel_pending();

        let (query, generation) = {
            let mut state = lock(&self.state);
            // Disarms a timer that woke before the abort landed
            state.keystroke += 1;
            if state.query.trim().is_empty() {
                state.reset();
                return Ok(None);
            }
            (state.query.clone(), state.begin_fetch())
        };

        match submit_search(self.provider.as_ref(), &self.counts, &query).await {
            Ok(submitted) => {
                lock(&self.state).apply_submission(generation, &query, Some(submitted.movies));
                Ok(submitted.counter)
            }
            Err(e) => {
                tracing::error!(error = %e, query = %query, "Error fetching or updating search count on submit");
                lock(&self.state).apply_submission(generation, &query, None);
                Err(e)
            }
        }
    }

    pub fn query(&self) -> String {
        lock(&self.state).query.clone()
    }

    /// The list currently on screen
    pub fn displayed(&self) -> MovieList {
        lock(&self.state).displayed.clone()
    }

    /// Query whose fetch last put a non-empty list on screen
    pub fn last_successful_query(&self) -> Option<String> {
        lock(&self.state).last_successful_query.clone()
    }

    /// Number of times the displayed list has been replaced
    pub fn revision(&self) -> u64 {
        lock(&self.state).revision
    }

    pub fn view(&self) -> SearchView {
        let state = lock(&self.state);
        let has_query = !state.query.trim().is_empty();
        let settled = !state.loading && state.error.is_none();

        let heading = (settled && has_query && !state.displayed.is_empty())
            .then(|| format!("Search Results for {}", state.query));

        let empty_message = match (settled && state.displayed.is_empty(), has_query) {
            (true, true) => Some("No movies found"),
            (true, false) => Some("Start typing to search for movies"),
            (false, _) => None,
        };

        SearchView {
            query: state.query.clone(),
            loading: state.loading,
            error: state.error.clone(),
            movies: state
                .displayed
                .iter()
                .map(|movie| MovieCard::from_movie(movie, &self.image_base_url))
                .collect(),
            heading,
            empty_message,
        }
    }
}

impl Drop for SearchScreen {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
