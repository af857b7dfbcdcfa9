/// TMDB API provider
///
/// API Flow:
/// 1. Search: /search/movie?query=... → paged movie summaries
/// 2. Discover (blank query): /discover/movie?sort_by=popularity.desc → paged movie summaries
/// 3. Details: /movie/{id} → detail record with nested genres and production companies
use reqwest::{Client as HttpClient, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieDetails},
    services::providers::MovieProvider,
};

#[derive(Debug, Deserialize)]
struct TmdbPage<T> {
    results: Vec<T>,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Path and parameters for a movie listing, search or discover depending on the query
    fn listing_request(query: &str) -> (&'static str, Vec<(&'static str, String)>) {
        let query = query.trim();
        if query.is_empty() {
            (
                "/discover/movie",
                vec![("sort_by", "popularity.desc".to_string())],
            )
        } else {
            ("/search/movie", vec![("query", query.to_string())])
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {}", path)));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        let (path, params) = Self::listing_request(query);
        let page: TmdbPage<Movie> = self.get_json(path, &params).await?;

        tracing::info!(
            query = %query,
            results = page.results.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(page.results)
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails> {
        let details: MovieDetails = self.get_json(&format!("/movie/{}", movie_id), &[]).await?;

        tracing::info!(
            movie_id = movie_id,
            genres = details.genres.len(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(details)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::HeaderMap, routing::get, Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", address)
    }

    /// Local TMDB stand-in: search works, discover is down, only movie 550 exists
    async fn create_stub_provider() -> TmdbProvider {
        let app = Router::new()
            .route(
                "/3/search/movie",
                get(|headers: HeaderMap| async move {
                    let authorized = headers
                        .get("authorization")
                        .and_then(|value| value.to_str().ok())
                        == Some("Bearer token");
                    if !authorized {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"status_code": 7})));
                    }
                    (
                        StatusCode::OK,
                        Json(json!({
                            "page": 1,
                            "results": [{
                                "id": 268,
                                "title": "Batman",
                                "poster_path": "/b.jpg",
                                "vote_average": 7.2,
                                "release_date": "1989-06-23"
                            }]
                        })),
                    )
                }),
            )
            .route(
                "/3/discover/movie",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            )
            .route(
                "/3/movie/:id",
                get(|Path(id): Path<u64>| async move {
                    if id != 550 {
                        return (StatusCode::NOT_FOUND, Json(json!({"status_code": 34})));
                    }
                    (
                        StatusCode::OK,
                        Json(json!({
                            "id": 550,
                            "title": "Fight Club",
                            "poster_path": null,
                            "vote_average": 8.4,
                            "vote_count": 26280,
                            "release_date": "1999-10-15",
                            "runtime": 139,
                            "budget": 63000000,
                            "revenue": 100853753,
                            "genres": [{"id": 18, "name": "Drama"}],
                            "production_companies": []
                        })),
                    )
                }),
            );

        TmdbProvider::new("token".to_string(), format!("{}/3", serve(app).await))
    }

    #[tokio::test]
    async fn test_search_decodes_results_over_http() {
        let provider = create_stub_provider().await;

        let movies = provider.search_movies("batman").await.unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, 268);
        assert_eq!(movies[0].release_year(), Some("1989"));
    }

    #[tokio::test]
    async fn test_server_error_is_external_api_error() {
        let provider = create_stub_provider().await;

        let result = provider.search_movies("").await;

        match result {
            Err(AppError::ExternalApi(message)) => assert!(message.contains("503")),
            other => panic!("expected ExternalApi, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_details_found_and_missing() {
        let provider = create_stub_provider().await;

        let details = provider.movie_details(550).await.unwrap();
        assert_eq!(details.movie.title, "Fight Club");
        assert_eq!(details.runtime, Some(139));
        assert_eq!(details.genres[0].name, "Drama");

        let missing = provider.movie_details(999_999).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_blank_query_uses_discover() {
        let (path, params) = TmdbProvider::listing_request("   ");
        assert_eq!(path, "/discover/movie");
        assert_eq!(params, vec![("sort_by", "popularity.desc".to_string())]);
    }

    #[test]
    fn test_query_uses_search_and_trims() {
        let (path, params) = TmdbProvider::listing_request(" batman ");
        assert_eq!(path, "/search/movie");
        assert_eq!(params, vec![("query", "batman".to_string())]);
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider = TmdbProvider::new("token".to_string(), "http://test.local/3/".to_string());
        assert_eq!(provider.api_url, "http://test.local/3");
        assert_eq!(provider.name(), "tmdb");
    }

    #[test]
    fn test_page_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 268, "title": "Batman", "poster_path": "/b.jpg", "vote_average": 7.2, "release_date": "1989-06-23"},
                {"id": 272, "title": "Batman Begins", "poster_path": null, "vote_average": 7.7, "release_date": "2005-06-10"}
            ],
            "total_pages": 1,
            "total_results": 2
        }"#;

        let page: TmdbPage<Movie> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].title, "Batman Begins");
    }
}
