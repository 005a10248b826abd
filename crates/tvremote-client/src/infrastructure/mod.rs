//! Infrastructure layer: network transports, timers and configuration.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `tvremote_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`transport`** – `WebsocketTransport` and `SocketTransport`, the two
//!   implementations of the application's `Transport` trait.
//! - **`factory`** – picks the transport from a `TransportKind` and wires a
//!   ready-to-use `RemoteControllerClient`.
//! - **`pacing`** – `TokioPacer`, the wall-clock pause with a
//!   `CancellationToken`.
//! - **`config`** – the TOML configuration file read by the binary.

pub mod config;
pub mod factory;
pub mod pacing;
pub mod transport;

pub use factory::{build_remote_controller, EndpointTransportFactory};
pub use pacing::TokioPacer;
