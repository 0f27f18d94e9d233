//! Remote catalog client.
//!
//! Purpose-built for the two endpoints the search lifecycle needs: the
//! popular-movies feed (empty query) and title search. Internally uses
//! reqwest for HTTP transport.

use async_trait::async_trait;
use url::Url;

use crate::error::{Error, FetchError};
use crate::movie::{Movie, MoviePage};

const USER_AGENT: &str = concat!("moviegrid/", env!("CARGO_PKG_VERSION"));

/// Sort order applied to every catalog request.
pub const SORT_BY_POPULARITY: &str = "popularity.desc";

/// Source of movie listings.
///
/// The production implementation talks to the remote catalog over HTTP;
/// tests substitute scripted sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch movies for `query`. An empty query returns the popular feed.
    ///
    /// An empty result list is a valid success, distinct from an error.
    async fn fetch(&self, query: &str) -> Result<Vec<Movie>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    inner: reqwest::Client,
    base_url: String,
    token: String,
}

impl CatalogClient {
    /// Build a client for `base_url`, authenticating every request with the
    /// static bearer `token`.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, Error> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| Error::Config(format!("catalog base URL: {e}")))?;

        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            inner,
            base_url,
            token: token.into(),
        })
    }

    /// Endpoint for `query`: the search endpoint with the query URL-escaped,
    /// or the popular-movies discover feed when the query is empty.
    fn endpoint(&self, query: &str) -> Result<Url, FetchError> {
        let raw = if query.is_empty() {
            format!("{}/discover/movie", self.base_url)
        } else {
            format!("{}/search/movie", self.base_url)
        };
        let mut url = Url::parse(&raw).map_err(|e| FetchError::Transport(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            if !query.is_empty() {
                pairs.append_pair("query", query);
            }
            pairs.append_pair("sort_by", SORT_BY_POPULARITY);
        }
        Ok(url)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch(&self, query: &str) -> Result<Vec<Movie>, FetchError> {
        let url = self.endpoint(query)?;
        tracing::debug!(%url, "catalog request");

        let response = self
            .inner
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let page: MoviePage = response
            .json()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(page.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CatalogClient {
        CatalogClient::new("https://api.example.com/3", "test-token").unwrap()
    }

    // ── endpoint selection ─────────────────────────────────────────────
    #[test]
    fn empty_query_uses_discover_feed() {
        let url = client().endpoint("").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/3/discover/movie?sort_by=popularity.desc"
        );
    }

    #[test]
    fn non_empty_query_uses_search_endpoint() {
        let url = client().endpoint("batman").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/3/search/movie?query=batman&sort_by=popularity.desc"
        );
    }

    #[test]
    fn query_is_url_escaped() {
        let url = client().endpoint("spider man & co").unwrap();
        assert!(url.query().unwrap().starts_with("query=spider+man+%26+co"));
        assert!(!url.as_str().contains(' '));
    }

    // ── construction ───────────────────────────────────────────────────
    #[test]
    fn trailing_slash_on_base_url_is_tolerated() {
        let client = CatalogClient::new("https://api.example.com/3/", "t").unwrap();
        let url = client.endpoint("").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/3/discover/movie?sort_by=popularity.desc"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(CatalogClient::new("not a url", "t").is_err());
    }
}
