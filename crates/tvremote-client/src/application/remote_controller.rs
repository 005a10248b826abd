//! RemoteControllerClient: ordered, retrying, paced delivery of key presses.
//!
//! The client owns at most one [`Transport`].  It is created lazily on the
//! first send (or an explicit [`RemoteControllerClient::open_connection`]),
//! replaced wholesale on every reconnect, and released on
//! [`RemoteControllerClient::close_connection`] or when the client is
//! dropped.
//!
//! # Delivery policy
//!
//! ```text
//! send_key(cmd)
//!   ├─ not connected?  open (failure is returned as-is)
//!   ├─ transmit ok     → Sent
//!   └─ transmit failed → close, open, transmit once more
//!                          ├─ ok     → SentAfterRetry
//!                          └─ failed → error, no third attempt
//! ```
//!
//! A sequence applies the same policy to every command in order and pauses
//! between consecutive commands through the injected [`Pacer`].  Cancelling a
//! pause ends the sequence early without an error.
//!
//! All methods take `&mut self`: one sequence at a time per client.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use tvremote_core::{BatchReport, CommandCode, ConnectionState, SendOutcome};

use crate::application::pacing::{Pacer, PauseOutcome};
use crate::application::transport::{ConnectionError, Transport, TransportFactory};

/// Pause between the commands of a sequence when no delay is given.
pub const DEFAULT_KEY_DELAY: Duration = Duration::from_millis(300);

/// Client for one TV.
pub struct RemoteControllerClient {
    factory: Box<dyn TransportFactory>,
    pacer: Arc<dyn Pacer>,
    transport: Option<Box<dyn Transport>>,
}

impl RemoteControllerClient {
    /// Creates a disconnected client.  No connection is attempted until the
    /// first send or [`open_connection`](Self::open_connection).
    pub fn new(factory: Box<dyn TransportFactory>, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            factory,
            pacer,
            transport: None,
        }
    }

    /// True iff a transport is owned and reports itself open.
    pub fn is_connected(&self) -> bool {
        self.transport.as_ref().is_some_and(|t| t.is_open())
    }

    pub fn state(&self) -> ConnectionState {
        if self.is_connected() {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    /// Opens a connection unless one is already open.
    ///
    /// A transport that has reported itself closed is released before the
    /// new one is opened.
    ///
    /// # Errors
    ///
    /// Returns the [`ConnectionError`] raised by the transport; the client
    /// stays disconnected.
    pub async fn open_connection(&mut self) -> Result<(), ConnectionError> {
        if self.is_connected() {
            return Ok(());
        }

        if let Some(mut stale) = self.transport.take() {
            if let Err(e) = stale.close().await {
                debug!("releasing stale connection to {}: {e}", self.factory.target());
            }
        }

        debug!("opening connection to {}", self.factory.target());
        let mut transport = self.factory.create();
        transport.open().await?;
        info!("connected to {}", self.factory.target());
        self.transport = Some(transport);
        Ok(())
    }

    /// Closes the owned transport, if any.
    ///
    /// The client is disconnected afterwards even when the teardown fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Close`] if the transport reports an I/O
    /// fault while closing.
    pub async fn close_connection(&mut self) -> Result<(), ConnectionError> {
        match self.transport.take() {
            Some(mut transport) => {
                debug!("closing connection to {}", self.factory.target());
                transport.close().await
            }
            None => Ok(()),
        }
    }

    /// Sends one command, reconnecting and retrying once on a send fault.
    ///
    /// # Errors
    ///
    /// Returns the open error if no connection can be established, or the
    /// error of the second attempt when the retry fails as well.
    pub async fn send_key(&mut self, command: &CommandCode) -> Result<SendOutcome, ConnectionError> {
        debug!("try to send command: {command}");

        if !self.is_connected() {
            self.open_connection().await?;
        }

        let outcome = self.deliver(command).await?;
        debug!("command {command} sent ({outcome:?})");
        Ok(outcome)
    }

    /// Sends `commands` in order with [`DEFAULT_KEY_DELAY`] between them.
    ///
    /// # Errors
    ///
    /// See [`send_keys_with_delay`](Self::send_keys_with_delay).
    pub async fn send_keys(&mut self, commands: &[CommandCode]) -> Result<BatchReport, ConnectionError> {
        self.send_keys_with_delay(commands, DEFAULT_KEY_DELAY).await
    }

    /// Sends `commands` in order, pausing `delay` between consecutive ones.
    ///
    /// Every command gets the same single-retry policy as
    /// [`send_key`](Self::send_key).  If a pause is cancelled, the remaining
    /// commands are dropped and the report is returned with `cancelled` set.
    /// A cancellation raised during an earlier sequence does not carry over.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::BatchAborted`] carrying the number of
    /// commands delivered before the one that failed.
    pub async fn send_keys_with_delay(
        &mut self,
        commands: &[CommandCode],
        delay: Duration,
    ) -> Result<BatchReport, ConnectionError> {
        debug!("try to send sequence of {} command(s)", commands.len());
        self.pacer.begin_sequence();
        let mut report = BatchReport::default();

        for (index, command) in commands.iter().enumerate() {
            if index > 0 && self.pacer.pause(delay).await == PauseOutcome::Cancelled {
                info!(
                    "command sequence cancelled after {} of {} command(s)",
                    report.delivered(),
                    commands.len()
                );
                report.cancelled = true;
                return Ok(report);
            }

            match self.send_key(command).await {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(source) => {
                    return Err(ConnectionError::BatchAborted {
                        delivered: report.delivered(),
                        source: Box::new(source),
                    })
                }
            }
        }

        debug!("command sequence sent ({} retried)", report.retried());
        Ok(report)
    }

    async fn deliver(&mut self, command: &CommandCode) -> Result<SendOutcome, ConnectionError> {
        match self.transmit(command).await {
            Ok(()) => return Ok(SendOutcome::Sent),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => warn!("couldn't send command {command}: {e}; retrying once"),
        }

        self.reconnect().await?;
        self.transmit(command).await?;
        Ok(SendOutcome::SentAfterRetry)
    }

    async fn reconnect(&mut self) -> Result<(), ConnectionError> {
        // The old channel is usually already gone; a teardown fault here must
        // not prevent the new connection.
        if let Err(e) = self.close_connection().await {
            debug!("ignoring close fault before reconnect: {e}");
        }
        self.open_connection().await
    }

    async fn transmit(&mut self, command: &CommandCode) -> Result<(), ConnectionError> {
        match self.transport.as_mut() {
            Some(transport) if transport.is_open() => transport.transmit(command).await,
            _ => Err(ConnectionError::NotOpen),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
