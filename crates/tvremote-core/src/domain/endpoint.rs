//! Addressing and identity of a single TV.
//!
//! An [`Endpoint`] is built once from configuration and never changes for
//! the lifetime of a client.  The port may be left as `0`, in which case the
//! well-known port of the selected [`TransportKind`] is used when a
//! connection is opened.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocol::ProtocolError;

/// Default port of the websocket remote-control service.
pub const WEBSOCKET_DEFAULT_PORT: u16 = 8001;

/// Default port of the legacy socket remote-control service.
pub const SOCKET_DEFAULT_PORT: u16 = 55000;

/// Which wire protocol is used to talk to the TV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// JSON text frames over a websocket (port 8001).
    #[default]
    Websocket,
    /// Legacy length-prefixed binary framing over TCP (port 55000).
    Socket,
}

impl TransportKind {
    /// The port used when the endpoint is configured with port `0`.
    pub fn default_port(self) -> u16 {
        match self {
            TransportKind::Websocket => WEBSOCKET_DEFAULT_PORT,
            TransportKind::Socket => SOCKET_DEFAULT_PORT,
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Websocket => f.write_str("websocket"),
            TransportKind::Socket => f.write_str("socket"),
        }
    }
}

impl std::str::FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "websocket" | "ws" => Ok(TransportKind::Websocket),
            "socket" | "legacy" => Ok(TransportKind::Socket),
            other => Err(format!("unknown transport kind: {other}")),
        }
    }
}

/// Host, port and identity strings used to open a connection to one TV.
///
/// # Example
///
/// ```rust
/// use tvremote_core::{Endpoint, TransportKind};
///
/// let ep = Endpoint::new("tv.local", 0, "openhab", "").unwrap();
/// assert_eq!(ep.resolved_port(TransportKind::Websocket), 8001);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    app_identity: String,
    device_identity: String,
}

impl Endpoint {
    /// Creates an endpoint after validating the host name.
    ///
    /// `port` may be `0` to select the protocol default at connect time.
    /// `app_identity` is the name shown on the TV's "allow this device"
    /// prompt; `device_identity` is only sent by the legacy socket protocol.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidHost`] if `host` is empty or contains
    /// whitespace or one of `/ ? # @`.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        app_identity: impl Into<String>,
        device_identity: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let host = host.into();
        if !is_valid_host(&host) {
            return Err(ProtocolError::InvalidHost(host));
        }
        Ok(Self {
            host,
            port,
            app_identity: app_identity.into(),
            device_identity: device_identity.into(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The configured port, which may be the `0` sentinel.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn app_identity(&self) -> &str {
        &self.app_identity
    }

    pub fn device_identity(&self) -> &str {
        &self.device_identity
    }

    /// The port a connection of `kind` will actually use.
    pub fn resolved_port(&self, kind: TransportKind) -> u16 {
        if self.port == 0 {
            kind.default_port()
        } else {
            self.port
        }
    }

    /// `host:port` for the given transport, suitable for `TcpStream::connect`.
    pub fn socket_target(&self, kind: TransportKind) -> String {
        format!("{}:{}", self.host, self.resolved_port(kind))
    }
}

fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && !host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@'))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_zero_resolves_to_websocket_default() {
        // Arrange
        let ep = Endpoint::new("tv.local", 0, "openhab", "").unwrap();

        // Act / Assert
        assert_eq!(ep.resolved_port(TransportKind::Websocket), 8001);
    }

    #[test]
    fn test_port_zero_resolves_to_socket_default() {
        let ep = Endpoint::new("tv.local", 0, "openhab", "").unwrap();
        assert_eq!(ep.resolved_port(TransportKind::Socket), 55000);
    }

    #[test]
    fn test_explicit_port_is_kept() {
        let ep = Endpoint::new("tv.local", 7000, "openhab", "").unwrap();
        assert_eq!(ep.resolved_port(TransportKind::Websocket), 7000);
        assert_eq!(ep.resolved_port(TransportKind::Socket), 7000);
        // The sentinel is not rewritten in the stored endpoint.
        assert_eq!(ep.port(), 7000);
    }

    #[test]
    fn test_configured_port_zero_is_not_overwritten() {
        let ep = Endpoint::new("tv.local", 0, "", "").unwrap();
        let _ = ep.resolved_port(TransportKind::Websocket);
        assert_eq!(ep.port(), 0);
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let result = Endpoint::new("", 0, "app", "");
        assert_eq!(result, Err(ProtocolError::InvalidHost(String::new())));
    }

    #[test]
    fn test_host_with_path_delimiter_is_rejected() {
        assert!(Endpoint::new("tv.local/evil", 0, "app", "").is_err());
        assert!(Endpoint::new("tv local", 0, "app", "").is_err());
        assert!(Endpoint::new("user@tv", 0, "app", "").is_err());
    }

    #[test]
    fn test_ip_address_host_is_accepted() {
        let ep = Endpoint::new("192.168.1.20", 0, "app", "").unwrap();
        assert_eq!(ep.socket_target(TransportKind::Socket), "192.168.1.20:55000");
    }

    #[test]
    fn test_transport_kind_parses_aliases() {
        assert_eq!("websocket".parse::<TransportKind>(), Ok(TransportKind::Websocket));
        assert_eq!("WS".parse::<TransportKind>(), Ok(TransportKind::Websocket));
        assert_eq!("legacy".parse::<TransportKind>(), Ok(TransportKind::Socket));
        assert!("carrier-pigeon".parse::<TransportKind>().is_err());
    }

    #[test]
    fn test_transport_kind_default_is_websocket() {
        assert_eq!(TransportKind::default(), TransportKind::Websocket);
    }
}
