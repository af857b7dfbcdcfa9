use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(CorsLayer::permissive())
        // Outermost so the trace span already sees the request ID
        .layer(middleware::from_fn(request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Search
        .route("/movies", get(handlers::search_movies))
        .route("/searches", post(handlers::submit_search))
        .route("/trending", get(handlers::trending))
        // Movie details
        .route("/movies/:id", get(handlers::movie_details))
        // Saved movies
        .route("/users/:user_id/saved", get(handlers::saved_movies))
        .route("/users/:user_id/saved/:movie_id", post(handlers::toggle_saved))
}
