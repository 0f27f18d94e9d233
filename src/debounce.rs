//! Debounce controller for raw search-term input.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Coalesces rapid term updates into a single emission after a quiet window.
///
/// Each [`update`](Debouncer::update) cancels the previously scheduled
/// emission and schedules a new one, so only the latest value is ever
/// emitted and nothing is emitted while the input keeps changing. There is
/// no upper bound on suspension.
pub struct Debouncer {
    window: Duration,
    tx: mpsc::UnboundedSender<String>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer; the paired receiver yields debounced terms.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                window,
                tx,
                pending: None,
            },
            rx,
        )
    }

    /// Register a raw term update, resetting the quiet window.
    pub fn update(&mut self, term: String) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let tx = self.tx.clone();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let _ = tx.send(term);
        }));
    }

    /// Whether an emission is scheduled but has not fired yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    const WINDOW: Duration = Duration::from_millis(500);

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_emit_before_window_elapses() {
        let (mut debouncer, mut rx) = Debouncer::new(WINDOW);
        debouncer.update("batman".to_string());
        settle().await;

        tokio::time::advance(Duration::from_millis(499)).await;
        settle().await;
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(rx.try_recv().unwrap(), "batman");
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_updates_emit_only_the_final_value() {
        let (mut debouncer, mut rx) = Debouncer::new(WINDOW);
        for term in ["b", "ba", "bat", "batman"] {
            debouncer.update(term.to_string());
            tokio::time::advance(Duration::from_millis(100)).await;
            settle().await;
        }

        tokio::time::advance(WINDOW).await;
        settle().await;

        assert_eq!(rx.try_recv().unwrap(), "batman");
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn continuous_typing_suppresses_emission_indefinitely() {
        let (mut debouncer, mut rx) = Debouncer::new(WINDOW);
        for i in 0..50 {
            debouncer.update(format!("term{i}"));
            tokio::time::advance(Duration::from_millis(400)).await;
            settle().await;
        }
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
        assert!(debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn initial_empty_value_waits_out_a_full_window() {
        let (mut debouncer, mut rx) = Debouncer::new(WINDOW);
        debouncer.update(String::new());
        settle().await;

        tokio::time::advance(Duration::from_millis(499)).await;
        settle().await;
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(rx.try_recv().unwrap(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_the_pending_emission() {
        let (mut debouncer, mut rx) = Debouncer::new(WINDOW);
        debouncer.update("batman".to_string());
        drop(debouncer);

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }
}
