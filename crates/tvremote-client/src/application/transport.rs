//! The transport seam between the controller and the network.
//!
//! [`Transport`] is implemented once per wire protocol in the infrastructure
//! layer.  The controller only ever holds a `Box<dyn Transport>` and creates
//! fresh instances through a [`TransportFactory`], so the protocol is chosen
//! once at construction time and never inspected afterwards.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tvremote_core::{CommandCode, ProtocolError};

/// Boxed error from the underlying socket or websocket library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while opening, using, or closing a connection to the TV.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The endpoint or a frame can never be valid; retrying cannot help.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The connection was not established within the connect budget.
    #[error("timed out after {budget:?} connecting to {target}")]
    Timeout { target: String, budget: Duration },

    /// The TV is unreachable or refused the connection or handshake.
    #[error("failed to connect to {target}: {source}")]
    ConnectFailed {
        target: String,
        #[source]
        source: BoxError,
    },

    /// `transmit` was called without an open channel.
    #[error("connection is not open")]
    NotOpen,

    /// Writing a frame to the channel failed.
    #[error("failed to send frame: {source}")]
    Send {
        #[source]
        source: BoxError,
    },

    /// Tearing down the channel reported an I/O fault.
    #[error("failed to close connection: {source}")]
    Close {
        #[source]
        source: BoxError,
    },

    /// The TV rejected this remote (legacy protocol).
    #[error("access denied by the TV")]
    AccessDenied,

    /// The TV is showing an "allow this device" prompt (legacy protocol).
    #[error("waiting for the remote to be allowed on the TV")]
    AwaitingApproval,

    /// Nobody answered the TV's approval prompt in time (legacy protocol).
    #[error("approval prompt on the TV timed out")]
    ApprovalTimeout,

    /// The TV answered the authentication packet with an unknown payload.
    #[error("unexpected reply from the TV: {0:02X?}")]
    UnexpectedReply(Vec<u8>),

    /// A paced sequence stopped at a command that could not be delivered.
    ///
    /// `delivered` commands before it reached the TV and are not undone.
    #[error("command sequence aborted after {delivered} delivered command(s): {source}")]
    BatchAborted {
        delivered: usize,
        #[source]
        source: Box<ConnectionError>,
    },
}

impl ConnectionError {
    /// Whether a reconnect-and-resend may succeed where this attempt failed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ConnectionError::Protocol(_))
    }
}

/// An open, bidirectional channel to one TV.
///
/// Implementations must log inbound frames but never act on them.
#[async_trait]
pub trait Transport: Send {
    /// Establishes the channel.  Opening an open transport is a no-op.
    async fn open(&mut self) -> Result<(), ConnectionError>;

    /// Releases the channel.  Closing a closed transport is a no-op that
    /// returns `Ok(())`.
    async fn close(&mut self) -> Result<(), ConnectionError>;

    /// Encodes `command` for this protocol and sends it as one frame.
    ///
    /// # Errors
    ///
    /// [`ConnectionError::NotOpen`] when the channel is not open, or
    /// [`ConnectionError::Send`] when the write fails.
    async fn transmit(&mut self, command: &CommandCode) -> Result<(), ConnectionError>;

    /// True iff a channel exists and has not been observed closing.
    fn is_open(&self) -> bool;
}

/// Builds unopened transports for one endpoint and protocol.
pub trait TransportFactory: Send + Sync {
    fn create(&self) -> Box<dyn Transport>;

    /// Human-readable connection target for log messages.
    fn target(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_errors_are_not_retryable() {
        let err = ConnectionError::from(ProtocolError::InvalidHost(String::new()));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_send_errors_are_retryable() {
        let err = ConnectionError::Send {
            source: "broken pipe".into(),
        };
        assert!(err.is_retryable());
        assert!(ConnectionError::NotOpen.is_retryable());
    }

    #[test]
    fn test_batch_aborted_message_reports_progress() {
        let err = ConnectionError::BatchAborted {
            delivered: 2,
            source: Box::new(ConnectionError::NotOpen),
        };
        assert_eq!(
            err.to_string(),
            "command sequence aborted after 2 delivered command(s): connection is not open"
        );
    }
}
