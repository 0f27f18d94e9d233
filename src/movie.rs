//! Wire types for the remote movie catalog.

use serde::{Deserialize, Serialize};

/// Base URL for poster images served by the catalog CDN.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// One movie record as returned by the catalog API.
///
/// Only the fields this crate consumes are modeled; everything else in the
/// payload is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

impl Movie {
    /// Full poster URL, or `None` when the catalog has no poster on file.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{POSTER_BASE_URL}{path}"))
    }
}

/// Response envelope shared by both catalog endpoints.
///
/// A missing `results` field is treated as an empty page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub results: Vec<Movie>,
}
