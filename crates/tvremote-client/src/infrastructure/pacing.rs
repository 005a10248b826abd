//! Wall-clock [`Pacer`] backed by `tokio::time::sleep`.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::pacing::{Pacer, PauseOutcome};

/// Sleeps for the requested delay unless [`TokioPacer::cancel`] is called
/// first.
///
/// Clones share one cancellation state, so a clone kept by a signal handler
/// can interrupt the pauses of the clone owned by the client.  Each sequence
/// gets a fresh token from [`Pacer::begin_sequence`]; a cancellation only
/// ends the sequence that was running when it was raised.
#[derive(Debug, Clone, Default)]
pub struct TokioPacer {
    current: Arc<Mutex<CancellationToken>>,
}

impl TokioPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interrupts the running pause, and every later pause of the current
    /// sequence.
    pub fn cancel(&self) {
        self.token().cancel();
    }

    /// True once the current sequence has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token().is_cancelled()
    }

    fn token(&self) -> CancellationToken {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Pacer for TokioPacer {
    fn begin_sequence(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = CancellationToken::new();
    }

    async fn pause(&self, delay: Duration) -> PauseOutcome {
        let token = self.token();
        tokio::select! {
            // Prefer reporting cancellation when both are ready.
            biased;
            _ = token.cancelled() => PauseOutcome::Cancelled,
            _ = tokio::time::sleep(delay) => PauseOutcome::Elapsed,
        }
    }
}
