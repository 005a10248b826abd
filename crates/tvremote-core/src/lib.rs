//! # tvremote-core
//!
//! Shared library for the Samsung TV remote-control client containing the
//! domain types and the wire encoders for both remote-control protocols.
//!
//! This crate performs no I/O.  It has no dependency on sockets, async
//! runtimes, or the process environment, so everything here can be tested
//! with plain `#[test]` functions.
//!
//! # Architecture overview
//!
//! Samsung TVs accept remote-control key presses over one of two protocols:
//!
//! - **Websocket** (2016+ models, port 8001): every key press is a JSON text
//!   frame sent on `ws://host:8001/api/v2/channels/samsung.remote.control`.
//! - **Legacy socket** (older models, port 55000): a length-prefixed binary
//!   framing where every string field is base64 encoded.
//!
//! This crate defines:
//!
//! - **`domain`** – The addressing information of a TV ([`Endpoint`]), the
//!   opaque command values sent to it ([`CommandCode`]), and the result types
//!   reported to callers ([`SendOutcome`], [`BatchReport`]).
//!
//! - **`protocol`** – How a [`CommandCode`] becomes bytes on the wire for each
//!   protocol, behind the [`CommandEncoder`] trait.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `tvremote_core::Endpoint` instead of `tvremote_core::domain::endpoint::Endpoint`.
pub use domain::command::CommandCode;
pub use domain::endpoint::{Endpoint, TransportKind};
pub use domain::state::{BatchReport, ConnectionState, SendOutcome};
pub use protocol::{CommandEncoder, LegacyEncoder, ProtocolError, WebsocketEncoder};
