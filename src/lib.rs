//! Moviegrid - headless movie search engine.
//!
//! Implements the request lifecycle behind a movie search page:
//! debounced term input, catalog fetches, view-state reconciliation, and a
//! fire-and-forget popular-search-term counter. The rendering layer is an
//! external collaborator: it feeds raw term updates in and consumes
//! [`search::SearchState`] snapshots.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod movie;
pub mod recorder;
pub mod search;
