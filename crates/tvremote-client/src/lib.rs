//! tvremote-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! # What does tvremote-client do?
//!
//! It sends remote-control key presses to one Samsung TV:
//!
//! 1. Opens a connection lazily, using the websocket or the legacy socket
//!    protocol chosen at construction.
//! 2. Sends each key as one frame.  If a send fails, the connection is
//!    closed, reopened, and the key is sent once more.
//! 3. Sends sequences in order with a pause between keys.  The pause can be
//!    cancelled (Ctrl-C in the binary), which ends the sequence early.

/// Application layer: delivery policy and the traits it depends on.
pub mod application;

/// Infrastructure layer: transports, pacing, configuration.
pub mod infrastructure;

pub use application::{ConnectionError, RemoteControllerClient, DEFAULT_KEY_DELAY};
