//! Wire encoders for the two remote-control protocols.
//!
//! Each protocol turns a [`CommandCode`] into one frame through the
//! [`CommandEncoder`] trait.  The transport that owns the connection decides
//! how the frame is written (a websocket text message or raw TCP bytes).

pub mod legacy;
pub mod websocket;

use thiserror::Error;

use crate::domain::command::CommandCode;

pub use legacy::{AuthReply, LegacyEncoder, LegacyReply};
pub use websocket::WebsocketEncoder;

/// Errors raised while building or parsing protocol frames.
///
/// None of these are transient: retrying with the same inputs fails the
/// same way.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The host name is empty or contains characters that are not allowed in
    /// the authority part of a URL.
    #[error("invalid host {0:?}")]
    InvalidHost(String),

    /// The connection URL built from the endpoint could not be parsed.
    #[error("invalid connection url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A string field does not fit in the 16-bit length prefix.
    #[error("field {field} is {len} bytes, the limit is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The byte slice is shorter than the frame it starts.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// A frame could not be serialized.
    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// Turns a command into the frame understood by one protocol.
pub trait CommandEncoder: Send + Sync {
    /// The frame type written by the transport (text or bytes).
    type Frame;

    /// Encodes `command` using its own wire value.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the command cannot be represented in the
    /// protocol's framing.
    fn encode(&self, command: &CommandCode) -> Result<Self::Frame, ProtocolError>;
}
