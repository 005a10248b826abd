//! Application layer: the delivery policy and the seams it depends on.
//!
//! **Dependency rule**: this layer depends on `tvremote_core` only.  Sockets,
//! websockets and timers live in the infrastructure layer behind the
//! [`transport::Transport`] and [`pacing::Pacer`] traits.
//!
//! # Sub-modules
//!
//! - **`remote_controller`** – `RemoteControllerClient`: connection
//!   lifecycle, single reconnect-retry, paced sequences.
//! - **`transport`** – the `Transport` / `TransportFactory` traits and the
//!   `ConnectionError` type.
//! - **`pacing`** – the cancellable `Pacer` used between commands.

pub mod pacing;
pub mod remote_controller;
pub mod transport;

pub use pacing::{Pacer, PauseOutcome};
pub use remote_controller::{RemoteControllerClient, DEFAULT_KEY_DELAY};
pub use transport::{ConnectionError, Transport, TransportFactory};
