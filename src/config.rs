//! Environment-driven configuration.
//!
//! One required secret (the catalog bearer token) plus optional overrides for
//! the catalog base URL, the debounce window, and the remote count store. A
//! missing token is not fatal at load time; the catalog surfaces it as an
//! HTTP 401 on the first request.

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

const API_TOKEN_ENV: &str = "MOVIEGRID_API_TOKEN";
const API_BASE_ENV: &str = "MOVIEGRID_API_BASE";
const DEBOUNCE_ENV: &str = "MOVIEGRID_DEBOUNCE_MS";

const STORE_ENDPOINT_ENV: &str = "MOVIEGRID_STORE_ENDPOINT";
const STORE_PROJECT_ENV: &str = "MOVIEGRID_STORE_PROJECT";
const STORE_DATABASE_ENV: &str = "MOVIEGRID_STORE_DATABASE";
const STORE_COLLECTION_ENV: &str = "MOVIEGRID_STORE_COLLECTION";
const STORE_KEY_ENV: &str = "MOVIEGRID_STORE_KEY";

/// Connection settings for the remote search-count store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: String,
    pub debounce: Duration,
    pub store: Option<StoreConfig>,
}

impl Config {
    /// Load configuration from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let api_token = std::env::var(API_TOKEN_ENV).unwrap_or_default();
        if api_token.is_empty() {
            tracing::warn!("{API_TOKEN_ENV} is not set; catalog requests will be unauthorized");
        }

        Self {
            api_base_url: std::env::var(API_BASE_ENV)
                .ok()
                .filter(|base| !base.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_token,
            debounce: parse_debounce(std::env::var(DEBOUNCE_ENV).ok().as_deref()),
            store: store_from(
                std::env::var(STORE_ENDPOINT_ENV).ok(),
                std::env::var(STORE_PROJECT_ENV).ok(),
                std::env::var(STORE_DATABASE_ENV).ok(),
                std::env::var(STORE_COLLECTION_ENV).ok(),
                std::env::var(STORE_KEY_ENV).ok(),
            ),
        }
    }
}

fn parse_debounce(raw: Option<&str>) -> Duration {
    let ms = raw
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_DEBOUNCE_MS);
    Duration::from_millis(ms)
}

/// Assemble the store section; all five settings are required for the remote
/// store to be used, otherwise counts stay in process memory.
fn store_from(
    endpoint: Option<String>,
    project_id: Option<String>,
    database_id: Option<String>,
    collection_id: Option<String>,
    api_key: Option<String>,
) -> Option<StoreConfig> {
    let any_set = endpoint.is_some()
        || project_id.is_some()
        || database_id.is_some()
        || collection_id.is_some()
        || api_key.is_some();

    match (endpoint, project_id, database_id, collection_id, api_key) {
        (Some(endpoint), Some(project_id), Some(database_id), Some(collection_id), Some(api_key)) => {
            Some(StoreConfig {
                endpoint,
                project_id,
                database_id,
                collection_id,
                api_key,
            })
        }
        _ => {
            if any_set {
                tracing::warn!("incomplete count-store configuration; search counts stay in memory");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_defaults_to_500ms() {
        assert_eq!(parse_debounce(None), Duration::from_millis(500));
    }

    #[test]
    fn debounce_parses_override() {
        assert_eq!(parse_debounce(Some("250")), Duration::from_millis(250));
        assert_eq!(parse_debounce(Some(" 250 ")), Duration::from_millis(250));
    }

    #[test]
    fn debounce_ignores_garbage() {
        assert_eq!(parse_debounce(Some("soon")), Duration::from_millis(500));
    }

    #[test]
    fn store_requires_all_settings() {
        let store = store_from(
            Some("https://store.example.com/v1".into()),
            Some("proj".into()),
            Some("db".into()),
            Some("col".into()),
            Some("key".into()),
        );
        assert!(store.is_some());

        let partial = store_from(Some("https://store.example.com/v1".into()), None, None, None, None);
        assert!(partial.is_none());

        assert!(store_from(None, None, None, None, None).is_none());
    }
}
