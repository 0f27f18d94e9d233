//! View-state reconciliation for the search lifecycle.
//!
//! [`SearchController`] owns the mutable [`SearchState`] and is the only
//! place it changes: raw terms flow in, debounced terms trigger catalog
//! fetches, and fetch completions drive the state transitions. The recorder
//! side-effect is dispatched as a detached task whose result is only logged.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::catalog::CatalogSource;
use crate::debounce::Debouncer;
use crate::error::FetchError;
use crate::movie::Movie;
use crate::recorder::Recorder;

/// Shown when a search succeeds with zero results.
pub const NO_RESULTS_MESSAGE: &str = "No movies found.";

/// Shown when a fetch fails for any reason.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch movies. Please try again later.";

/// Mutable view state, owned by the controller.
///
/// Invariants: `is_loading` is true only while a fetch is outstanding;
/// `results` and `error_message` are never both populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    /// Raw term as typed, before debouncing.
    pub term: String,
    /// Last debounced term, i.e. the query of the most recent fetch.
    pub debounced_term: String,
    pub results: Vec<Movie>,
    pub is_loading: bool,
    pub error_message: String,
}

/// Conceptual phase derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    WithResults,
    Empty,
    Failed,
}

impl SearchState {
    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        if self.is_loading {
            SearchPhase::Loading
        } else if !self.results.is_empty() {
            SearchPhase::WithResults
        } else if self.error_message == NO_RESULTS_MESSAGE {
            SearchPhase::Empty
        } else if !self.error_message.is_empty() {
            SearchPhase::Failed
        } else {
            SearchPhase::Idle
        }
    }
}

/// Outcome of one spawned fetch, tagged with its start order.
struct FetchSettled {
    seq: u64,
    term: String,
    outcome: Result<Vec<Movie>, FetchError>,
}

pub struct SearchController {
    state: SearchState,
    catalog: Arc<dyn CatalogSource>,
    recorder: Option<Arc<Recorder>>,
    window: Duration,
    next_seq: u64,
    /// Sequence of the most recently started fetch. Completions with an
    /// older sequence are stale and discarded.
    latest_seq: u64,
    inflight: usize,
}

impl SearchController {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        recorder: Option<Arc<Recorder>>,
        window: Duration,
    ) -> Self {
        Self {
            state: SearchState::default(),
            catalog,
            recorder,
            window,
            next_seq: 0,
            latest_seq: 0,
            inflight: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Drive the lifecycle until `raw_terms` closes and all pending work has
    /// settled.
    ///
    /// `on_state` is the rendering-layer callback, invoked after every state
    /// change. The initial empty term is seeded through the debouncer, so the
    /// popular feed loads once the first quiet window elapses.
    pub async fn run<F>(mut self, mut raw_terms: mpsc::UnboundedReceiver<String>, mut on_state: F)
    where
        F: FnMut(&SearchState),
    {
        let (mut debouncer, mut debounced_rx) = Debouncer::new(self.window);
        let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<FetchSettled>();

        debouncer.update(self.state.term.clone());

        let mut raw_open = true;
        loop {
            tokio::select! {
                raw = raw_terms.recv(), if raw_open => match raw {
                    Some(raw) => {
                        self.state.term = raw.clone();
                        debouncer.update(raw);
                    }
                    None => raw_open = false,
                },
                Some(term) = debounced_rx.recv() => {
                    let seq = self.begin_search(term.clone());
                    self.spawn_fetch(seq, term, &settled_tx);
                    on_state(&self.state);
                }
                Some(settled) = settled_rx.recv() => {
                    self.inflight -= 1;
                    if self.apply_settled(settled) {
                        on_state(&self.state);
                    }
                }
            }

            let quiescent = self.inflight == 0
                && !debouncer.is_pending()
                && debounced_rx.is_empty()
                && settled_rx.is_empty();
            if !raw_open && quiescent {
                break;
            }
        }
    }

    /// Debounced term changed: enter `Loading` and allocate the fetch
    /// sequence number.
    fn begin_search(&mut self, term: String) -> u64 {
        self.state.debounced_term = term;
        self.state.is_loading = true;
        self.state.error_message.clear();

        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = seq;
        seq
    }

    fn spawn_fetch(&mut self, seq: u64, term: String, settled_tx: &mpsc::UnboundedSender<FetchSettled>) {
        self.inflight += 1;
        let catalog = Arc::clone(&self.catalog);
        let settled_tx = settled_tx.clone();
        tokio::spawn(async move {
            let outcome = catalog.fetch(&term).await;
            let _ = settled_tx.send(FetchSettled { seq, term, outcome });
        });
    }

    /// Apply a fetch completion. Returns false when the completion was stale
    /// and the state was left untouched.
    fn apply_settled(&mut self, settled: FetchSettled) -> bool {
        if settled.seq != self.latest_seq {
            tracing::debug!(
                seq = settled.seq,
                latest = self.latest_seq,
                term = %settled.term,
                "discarding stale fetch completion"
            );
            return false;
        }

        self.state.is_loading = false;
        match settled.outcome {
            Ok(movies) if movies.is_empty() => {
                self.state.results.clear();
                self.state.error_message = NO_RESULTS_MESSAGE.to_string();
            }
            Ok(movies) => {
                self.state.results = movies;
                self.state.error_message.clear();
                if !settled.term.is_empty() {
                    self.dispatch_record(&settled.term);
                }
            }
            Err(err) => {
                tracing::warn!(term = %settled.term, error = %err, "fetch failed");
                self.state.results.clear();
                self.state.error_message = FETCH_FAILED_MESSAGE.to_string();
            }
        }
        true
    }

    /// Fire-and-forget count update for a successful non-empty search. The
    /// task's result is discarded except for logging; failures never touch
    /// the view state.
    fn dispatch_record(&self, term: &str) {
        let Some(recorder) = &self.recorder else {
            return;
        };
        let Some(movie) = self.state.results.first().cloned() else {
            return;
        };

        let recorder = Arc::clone(recorder);
        let term = term.to_string();
        tokio::spawn(async move {
            if let Err(err) = recorder.record(&term, &movie).await {
                tracing::warn!(term = %term, error = %err, "search count not recorded");
            }
        });
    }
}
