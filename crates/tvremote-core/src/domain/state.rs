//! Connection state and delivery results reported to callers.

/// Whether a client currently owns an open channel to the TV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No transport, or the owned transport has reported itself closed.
    #[default]
    Closed,
    /// The owned transport is open and may be used for transmission.
    Open,
}

/// How a single command reached the TV.
///
/// A command that could not be delivered is reported as the `Err` side of
/// the send result instead of a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Delivered on the first attempt.
    Sent,
    /// The first attempt failed; delivered after one reconnect.
    SentAfterRetry,
}

/// Result of a paced batch of commands.
///
/// `outcomes[i]` belongs to the `i`-th command of the batch.  When the batch
/// was cancelled during a pause, `outcomes` is shorter than the input and
/// `cancelled` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<SendOutcome>,
    pub cancelled: bool,
}

impl BatchReport {
    /// Number of commands delivered to the TV.
    pub fn delivered(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of delivered commands that needed a reconnect.
    pub fn retried(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == SendOutcome::SentAfterRetry)
            .count()
    }
}
