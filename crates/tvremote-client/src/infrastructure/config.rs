//! TOML configuration file for the `tvremote` binary.
//!
//! Example:
//!
//! ```toml
//! [device]
//! host = "tv.local"
//! port = 0              # 0 selects 8001 (websocket) or 55000 (socket)
//! transport = "websocket"
//!
//! [identity]
//! app_name = "tvremote"
//! device_id = ""
//!
//! [pacing]
//! key_delay_ms = 300
//! ```
//!
//! Every field has a default, so a partial file (or no file) is valid.  An
//! empty `host` is only rejected when the endpoint is built.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tvremote_core::{Endpoint, ProtocolError, TransportKind};

use crate::application::remote_controller::DEFAULT_KEY_DELAY;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Where the TV is and which protocol it speaks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default)]
    pub host: String,
    /// `0` selects the protocol's default port.
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub transport: TransportKind,
}

/// Names this remote presents to the TV.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IdentityConfig {
    /// Shown on the TV's "allow this device" prompt.
    #[serde(default)]
    pub app_name: String,
    /// Only sent by the legacy socket protocol.
    #[serde(default)]
    pub device_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PacingConfig {
    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,
}

fn default_key_delay_ms() -> u64 {
    DEFAULT_KEY_DELAY.as_millis() as u64
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            key_delay_ms: default_key_delay_ms(),
        }
    }
}

impl RemoteConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its content is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidHost`] if `device.host` is empty or
    /// malformed.
    pub fn endpoint(&self) -> Result<Endpoint, ProtocolError> {
        Endpoint::new(
            self.device.host.clone(),
            self.device.port,
            self.identity.app_name.clone(),
            self.identity.device_id.clone(),
        )
    }

    pub fn key_delay(&self) -> Duration {
        Duration::from_millis(self.pacing.key_delay_ms)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let cfg = RemoteConfig::default();
        assert_eq!(cfg.device.port, 0);
        assert_eq!(cfg.device.transport, TransportKind::Websocket);
        assert_eq!(cfg.identity.app_name, "");
        assert_eq!(cfg.key_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg = RemoteConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, RemoteConfig::default());
    }

    #[test]
    fn test_full_toml_is_parsed() {
        // Arrange
        let text = r#"
            [device]
            host = "192.168.1.40"
            port = 55000
            transport = "socket"

            [identity]
            app_name = "living-room"
            device_id = "remote-1"

            [pacing]
            key_delay_ms = 50
        "#;

        // Act
        let cfg = RemoteConfig::from_toml_str(text).unwrap();

        // Assert
        assert_eq!(cfg.device.host, "192.168.1.40");
        assert_eq!(cfg.device.transport, TransportKind::Socket);
        assert_eq!(cfg.identity.device_id, "remote-1");
        assert_eq!(cfg.key_delay(), Duration::from_millis(50));

        let ep = cfg.endpoint().unwrap();
        assert_eq!(ep.resolved_port(TransportKind::Socket), 55000);
        assert_eq!(ep.app_identity(), "living-room");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let cfg = RemoteConfig::from_toml_str("[device]\nhost = \"tv.local\"\n").unwrap();
        assert_eq!(cfg.device.host, "tv.local");
        assert_eq!(cfg.device.port, 0);
        assert_eq!(cfg.pacing.key_delay_ms, 300);
    }

    #[test]
    fn test_unknown_transport_is_a_parse_error() {
        let result = RemoteConfig::from_toml_str("[device]\ntransport = \"infrared\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_host_fails_endpoint_validation() {
        let cfg = RemoteConfig::default();
        assert_eq!(cfg.endpoint(), Err(ProtocolError::InvalidHost(String::new())));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = RemoteConfig::load(Path::new("/nonexistent/tvremote/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let mut cfg = RemoteConfig::default();
        cfg.device.host = "tv.local".to_string();
        cfg.device.transport = TransportKind::Socket;

        let text = toml::to_string(&cfg).unwrap();

        assert_eq!(RemoteConfig::from_toml_str(&text).unwrap(), cfg);
    }
}
