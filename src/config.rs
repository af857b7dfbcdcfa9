use serde::Deserialize;
use std::time::Duration;

/// Which document store implementation backs the data access layer
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Appwrite,
    Memory,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Appwrite REST endpoint, including the `/v1` suffix
    #[serde(default = "default_appwrite_endpoint")]
    pub appwrite_endpoint: String,

    /// Appwrite project the collections live in
    #[serde(default)]
    pub appwrite_project_id: String,

    /// Server API key, sent as `X-Appwrite-Key` when present
    #[serde(default)]
    pub appwrite_api_key: Option<String>,

    pub appwrite_database_id: String,

    /// Collection holding search-term usage counters
    pub appwrite_collection_id: String,

    /// Collection holding per-user saved movies
    pub appwrite_save_collection_id: String,

    /// TMDB read access token (bearer)
    pub tmdb_api_key: String,

    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix for poster paths returned by TMDB
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    /// Quiet period before a typed query is fetched
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_appwrite_endpoint() -> String {
    "https://nyc.cloud.appwrite.io/v1".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

pub fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Appwrite
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Rejects combinations that would only fail later, on the first request
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.store_backend == StoreBackend::Appwrite && self.appwrite_project_id.trim().is_empty()
        {
            anyhow::bail!("APPWRITE_PROJECT_ID is required for the appwrite store backend");
        }
        if self.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("TMDB_API_KEY must not be empty");
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn vars(overrides: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut vars: BTreeMap<&str, &str> = BTreeMap::from([
            ("APPWRITE_PROJECT_ID", "movies"),
            ("APPWRITE_DATABASE_ID", "db"),
            ("APPWRITE_COLLECTION_ID", "metrics"),
            ("APPWRITE_SAVE_COLLECTION_ID", "saved"),
            ("TMDB_API_KEY", "token"),
        ]);
        vars.extend(overrides.iter().copied());
        vars.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();
        assert_eq!(config.appwrite_endpoint, "https://nyc.cloud.appwrite.io/v1");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_image_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.store_backend, StoreBackend::Appwrite);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.appwrite_api_key, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_memory_backend_without_project() {
        let config: Config = envy::from_iter(vars(&[
            ("STORE_BACKEND", "memory"),
            ("APPWRITE_PROJECT_ID", ""),
        ]))
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_appwrite_backend_requires_project() {
        let config: Config = envy::from_iter(vars(&[("APPWRITE_PROJECT_ID", " ")])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_required_variable() {
        let result = envy::from_iter::<_, Config>(vec![(
            "TMDB_API_KEY".to_string(),
            "token".to_string(),
        )]);
        assert!(result.is_err());
    }
}
