//! Domain layer: pure types describing a TV and the commands sent to it.
//!
//! Nothing in this module performs I/O.  Validation that can be done without
//! touching the network (for example rejecting a host name that would break
//! the connection URL) happens here so that it surfaces before any socket is
//! opened.

pub mod command;
pub mod endpoint;
pub mod state;

pub use command::CommandCode;
pub use endpoint::{Endpoint, TransportKind};
pub use state::{BatchReport, ConnectionState, SendOutcome};
