use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Movie, SearchCounter, ToggleOutcome},
    screens::{DetailView, SavedView},
    services::search,
};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitSearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitSearchResponse {
    pub movies: Vec<Movie>,
    pub counter: Option<SearchCounter>,
}

#[derive(Debug, Deserialize)]
pub struct UserParams {
    pub user_id: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Search listing; a blank query returns the popular listing
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = search::search_movies(state.provider.clone(), &params.query).await?;
    Ok(Json(movies))
}

/// Explicit search submission, records the usage counter
pub async fn submit_search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SubmitSearchRequest>,
) -> AppResult<Json<SubmitSearchResponse>> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("query must not be blank".to_string()));
    }

    tracing::debug!(request_id = %request_id, query = %query, "Submitting search");

    let submitted =
        search::submit_search(state.provider.as_ref(), &state.search_counts, query).await?;

    Ok(Json(SubmitSearchResponse {
        movies: submitted.movies,
        counter: submitted.counter,
    }))
}

/// Most-searched terms, highest count first
pub async fn trending(State(state): State<AppState>) -> AppResult<Json<Vec<SearchCounter>>> {
    let counters = state.search_counts.trending_movies().await?;
    Ok(Json(counters))
}

pub async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
    Query(params): Query<UserParams>,
) -> AppResult<Json<DetailView>> {
    let screen = state.detail_screen(movie_id, &params.user_id).await?;
    Ok(Json(screen.view()))
}

/// Saves the movie for the user, or removes an existing save
pub async fn toggle_saved(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, movie_id)): Path<(String, u64)>,
) -> AppResult<Json<ToggleOutcome>> {
    let screen = state.detail_screen(movie_id, &user_id).await?;

    let outcome = screen
        .toggle_save()
        .await?
        .ok_or_else(|| AppError::Internal("save already in progress".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        movie_id = movie_id,
        action = ?outcome.action,
        "Saved status toggled"
    );

    Ok(Json(outcome))
}

pub async fn saved_movies(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<SavedView>> {
    let mut screen = state.saved_screen(&user_id);
    screen.refresh().await?;
    Ok(Json(screen.view()))
}
