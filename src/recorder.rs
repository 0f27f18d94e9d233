//! Search-count recording.
//!
//! Every successful non-empty search upserts a counter document in a remote
//! document store, keyed by the normalized search term and carrying a
//! snapshot of the top-ranked movie. Failures here are logged and never
//! surfaced to the search flow.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::config::StoreConfig;
use crate::error::{Error, RecordError};
use crate::movie::Movie;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";

/// One counter document, keyed by the normalized search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCountRecord {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u64,
    pub movie_id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Normalize a raw query into the stable lookup key.
#[must_use]
pub fn normalize_term(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Storage backend for search-count records.
#[async_trait]
pub trait CountStore: Send + Sync {
    /// Look up the record for a normalized term.
    async fn find(&self, term: &str) -> Result<Option<SearchCountRecord>, RecordError>;

    /// Create a new record.
    async fn create(&self, record: SearchCountRecord) -> Result<(), RecordError>;

    /// Increment the count of an existing record by one.
    async fn increment(&self, term: &str) -> Result<(), RecordError>;
}

/// Upserts per-term search counters against a [`CountStore`].
pub struct Recorder {
    store: Arc<dyn CountStore>,
}

impl Recorder {
    #[must_use]
    pub fn new(store: Arc<dyn CountStore>) -> Self {
        Self { store }
    }

    /// Record one successful search of `query`, represented by the
    /// highest-popularity `movie` it matched.
    ///
    /// Increments the existing counter for the normalized term, or creates
    /// it with count = 1 and the movie's id/title/poster snapshot.
    pub async fn record(&self, query: &str, movie: &Movie) -> Result<(), RecordError> {
        let term = normalize_term(query);
        if term.is_empty() {
            return Ok(());
        }

        match self.store.find(&term).await? {
            Some(_) => self.store.increment(&term).await,
            None => {
                self.store
                    .create(SearchCountRecord {
                        search_term: term,
                        count: 1,
                        movie_id: movie.id,
                        title: movie.title.clone(),
                        poster_url: movie.poster_url(),
                        updated_at: Some(Utc::now()),
                    })
                    .await
            }
        }
    }
}

/// In-process store, used by tests and as the fallback when no remote store
/// is configured. Counts are not durable.
#[derive(Debug, Default)]
pub struct MemoryCountStore {
    records: Mutex<HashMap<String, SearchCountRecord>>,
}

impl MemoryCountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the record for `term`, if any.
    #[must_use]
    pub fn get(&self, term: &str) -> Option<SearchCountRecord> {
        self.records.lock().unwrap().get(term).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl CountStore for MemoryCountStore {
    async fn find(&self, term: &str) -> Result<Option<SearchCountRecord>, RecordError> {
        Ok(self.records.lock().unwrap().get(term).cloned())
    }

    async fn create(&self, record: SearchCountRecord) -> Result<(), RecordError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.search_term.clone(), record);
        Ok(())
    }

    async fn increment(&self, term: &str) -> Result<(), RecordError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(term)
            .ok_or_else(|| RecordError::StoreUnavailable(format!("no record for term {term:?}")))?;
        record.count += 1;
        record.updated_at = Some(Utc::now());
        Ok(())
    }
}

/// Remote document store speaking an Appwrite-style REST protocol: one
/// document per normalized term, addressed by the term itself.
pub struct HttpCountStore {
    inner: reqwest::Client,
    endpoint: Url,
    config: StoreConfig,
}

impl HttpCountStore {
    pub fn new(config: StoreConfig) -> Result<Self, Error> {
        let endpoint = Url::parse(config.endpoint.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("store endpoint: {e}")))?;
        let inner = reqwest::Client::builder()
            .user_agent(concat!("moviegrid/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            inner,
            endpoint,
            config,
        })
    }

    /// URL of the documents collection, optionally addressing one document.
    fn documents_url(&self, document_id: Option<&str>) -> Result<Url, RecordError> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| RecordError::StoreUnavailable("store endpoint cannot be a base".into()))?;
            segments.extend([
                "databases",
                self.config.database_id.as_str(),
                "collections",
                self.config.collection_id.as_str(),
                "documents",
            ]);
            if let Some(id) = document_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.inner
            .request(method, url)
            .header(PROJECT_HEADER, &self.config.project_id)
            .header(KEY_HEADER, &self.config.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }
}

fn unavailable(err: impl std::fmt::Display) -> RecordError {
    RecordError::StoreUnavailable(err.to_string())
}

#[async_trait]
impl CountStore for HttpCountStore {
    async fn find(&self, term: &str) -> Result<Option<SearchCountRecord>, RecordError> {
        let url = self.documents_url(Some(term))?;
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RecordError::StoreUnavailable(format!(
                "store returned HTTP {}",
                status.as_u16()
            )));
        }
        response
            .json::<SearchCountRecord>()
            .await
            .map(Some)
            .map_err(unavailable)
    }

    async fn create(&self, record: SearchCountRecord) -> Result<(), RecordError> {
        let url = self.documents_url(None)?;
        let body = json!({
            "documentId": record.search_term,
            "data": record,
        });
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RecordError::StoreUnavailable(format!(
                "store returned HTTP {}",
                response.status().as_u16()
            )))
        }
    }

    async fn increment(&self, term: &str) -> Result<(), RecordError> {
        let current = self
            .find(term)
            .await?
            .ok_or_else(|| RecordError::StoreUnavailable(format!("no record for term {term:?}")))?;

        let url = self.documents_url(Some(term))?;
        let body = json!({
            "data": {
                "count": current.count + 1,
                "updated_at": Utc::now(),
            },
        });
        let response = self
            .request(reqwest::Method::PATCH, url)
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RecordError::StoreUnavailable(format!(
                "store returned HTTP {}",
                response.status().as_u16()
            )))
        }
    }
}
