//! Network transports implementing [`Transport`](crate::application::Transport).
//!
//! - **`websocket`** – JSON text frames on the `samsung.remote.control`
//!   channel (port 8001).
//! - **`socket`** – the legacy binary protocol over raw TCP (port 55000).
//!
//! Both transports spawn one background task per open connection that reads
//! whatever the TV sends, logs it at `debug` level, and clears a shared
//! `alive` flag when the TV closes the connection.  `is_open()` reads that
//! flag, so a silently dropped channel is noticed before the next transmit.

use std::time::Duration;

pub mod socket;
pub mod websocket;

pub use socket::SocketTransport;
pub use websocket::WebsocketTransport;

/// Upper bound on establishing a connection, handshake included.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
