//! Pause between the commands of a sequence.
//!
//! The controller never sleeps directly.  It asks a [`Pacer`] to pause, so
//! tests can record the requested delays and inject a cancellation at an
//! exact point without waiting on the wall clock.

use std::time::Duration;

use async_trait::async_trait;

/// How a pause ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The full delay passed.
    Elapsed,
    /// The pause was interrupted; the remaining commands must be abandoned.
    Cancelled,
}

/// A cancellable delay.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Called once before each sequence.  A cancellation only applies to the
    /// sequence it was raised in; pacers that remember one forget it here.
    fn begin_sequence(&self) {}

    async fn pause(&self, delay: Duration) -> PauseOutcome;
}
