//! `tvremote`: send remote-control keys to a Samsung TV.
//!
//! # Usage
//!
//! ```text
//! tvremote [OPTIONS] <KEY>...
//!
//! Options:
//!   --config     <FILE>   TOML config file
//!   --host       <HOST>   TV host name or IP address
//!   --port       <PORT>   Port (0 = protocol default)
//!   --app-name   <NAME>   Name shown on the TV's approval prompt
//!   --device-id  <ID>     Device id (legacy socket protocol only)
//!   --transport  <KIND>   websocket | socket
//!   --delay-ms   <MS>     Pause between keys [default: 300]
//! ```
//!
//! Precedence: command-line flag, then environment variable, then config
//! file, then built-in default.
//!
//! Pressing Ctrl+C during the pause between two keys stops the sequence; the
//! keys already sent are reported and the process exits successfully.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tvremote_client::infrastructure::config::RemoteConfig;
use tvremote_client::infrastructure::{build_remote_controller, TokioPacer};
use tvremote_core::{CommandCode, TransportKind};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Samsung TV remote control.
#[derive(Debug, Parser)]
#[command(
    name = "tvremote",
    about = "Send remote-control keys to a Samsung TV",
    version
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "TVREMOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Host name or IP address of the TV.
    #[arg(long, env = "TVREMOTE_HOST")]
    host: Option<String>,

    /// Port of the remote-control service; 0 selects 8001 (websocket) or
    /// 55000 (socket).
    #[arg(long, env = "TVREMOTE_PORT")]
    port: Option<u16>,

    /// Application name shown on the TV's "allow this device" prompt.
    #[arg(long, env = "TVREMOTE_APP_NAME")]
    app_name: Option<String>,

    /// Device identity sent by the legacy socket protocol.
    #[arg(long, env = "TVREMOTE_DEVICE_ID")]
    device_id: Option<String>,

    /// Wire protocol: `websocket` or `socket`.
    #[arg(long, env = "TVREMOTE_TRANSPORT")]
    transport: Option<TransportKind>,

    /// Pause between consecutive keys in milliseconds.
    #[arg(long, env = "TVREMOTE_DELAY_MS")]
    delay_ms: Option<u64>,

    /// Keys to send in order, e.g. `KEY_VOLUP KEY_VOLUP KEY_MUTE`.
    #[arg(required = true)]
    keys: Vec<CommandCode>,
}

impl Cli {
    /// Loads the config file (if any) and applies the command-line overrides.
    fn into_config(self) -> anyhow::Result<(RemoteConfig, Vec<CommandCode>)> {
        let mut config = match &self.config {
            Some(path) => RemoteConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RemoteConfig::default(),
        };

        if let Some(host) = self.host {
            config.device.host = host;
        }
        if let Some(port) = self.port {
            config.device.port = port;
        }
        if let Some(transport) = self.transport {
            config.device.transport = transport;
        }
        if let Some(app_name) = self.app_name {
            config.identity.app_name = app_name;
        }
        if let Some(device_id) = self.device_id {
            config.identity.device_id = device_id;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.pacing.key_delay_ms = delay_ms;
        }

        Ok((config, self.keys))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `RUST_LOG` controls the level; default is `info`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (config, keys) = Cli::parse().into_config()?;
    let endpoint = config.endpoint().context("invalid TV address")?;
    let kind = config.device.transport;
    let delay: Duration = config.key_delay();

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let pacer = TokioPacer::new();
    let interrupt = pacer.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; stopping after the current key");
            interrupt.cancel();
        }
    });

    let mut client = build_remote_controller(endpoint, kind, Arc::new(pacer));
    let result = client.send_keys_with_delay(&keys, delay).await;

    if let Err(e) = client.close_connection().await {
        warn!("closing connection failed: {e}");
    }

    let report = result.context("failed to send keys")?;
    if report.cancelled {
        info!("sent {} of {} key(s) before interruption", report.delivered(), keys.len());
    } else {
        info!(
            "sent {} key(s) ({} after reconnect)",
            report.delivered(),
            report.retried()
        );
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_at_least_one_key() {
        let result = Cli::try_parse_from(["tvremote", "--host", "tv.local"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_keys_are_kept_in_order() {
        let cli = Cli::parse_from(["tvremote", "KEY_VOLUP", "KEY_VOLUP", "KEY_MUTE"]);
        let names: Vec<String> = cli.keys.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["KEY_VOLUP", "KEY_VOLUP", "KEY_MUTE"]);
    }

    #[test]
    fn test_cli_rejects_unknown_transport() {
        let result = Cli::try_parse_from(["tvremote", "--transport", "infrared", "KEY_1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_into_config_without_file_uses_defaults() {
        // Arrange
        let cli = Cli::parse_from(["tvremote", "--host", "tv.local", "POWER"]);

        // Act
        let (config, keys) = cli.into_config().unwrap();

        // Assert
        assert_eq!(config.device.host, "tv.local");
        assert_eq!(config.device.transport, TransportKind::Websocket);
        assert_eq!(config.key_delay(), Duration::from_millis(300));
        assert_eq!(keys.len(), 1);
        assert_eq!(config.endpoint().unwrap().resolved_port(TransportKind::Websocket), 8001);
    }

    #[test]
    fn test_flags_override_config_file() {
        // Arrange: a config file naming one TV, overridden on the command line.
        let path = std::env::temp_dir().join(format!("tvremote-cli-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[device]\nhost = \"file.local\"\ntransport = \"socket\"\n\n[pacing]\nkey_delay_ms = 50\n",
        )
        .unwrap();
        let cli = Cli::parse_from([
            "tvremote",
            "--config",
            path.to_str().unwrap(),
            "--host",
            "flag.local",
            "--delay-ms",
            "10",
            "KEY_1",
        ]);

        // Act
        let (config, _) = cli.into_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        // Assert
        assert_eq!(config.device.host, "flag.local");
        assert_eq!(config.device.transport, TransportKind::Socket, "kept from file");
        assert_eq!(config.key_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["tvremote", "--config", "/nonexistent/tvremote.toml", "KEY_1"]);
        assert!(cli.into_config().is_err());
    }
}
