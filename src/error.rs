//! Error taxonomy.
//!
//! Fetch and record failures are deliberately separate enums: the reconciler
//! converts every [`FetchError`] into the single user-visible failure message,
//! while [`RecordError`] never reaches the UI at all (logged only).

use thiserror::Error;

/// Failure fetching from the remote movie catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The catalog answered with a non-OK HTTP status.
    #[error("catalog returned HTTP {status}")]
    Http { status: u16 },

    /// Network failure, or a body that was not valid catalog JSON.
    #[error("catalog transport failure: {0}")]
    Transport(String),
}

/// Failure talking to the remote search-count store.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("count store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Crate-level error for configuration and client construction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
}
