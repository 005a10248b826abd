//! Legacy socket transport (TVs before 2016, port 55000).
//!
//! Opening a connection is a two-step exchange that must finish within
//! [`CONNECT_TIMEOUT`]:
//!
//! 1. TCP connect to `{host}:{port}`.
//! 2. Send the authentication packet (local IP, device id, app name) and read
//!    one reply.  Only an "access granted" reply leaves the transport open.
//!
//! Key presses are written as key packets.  Replies to key packets carry no
//! information the client acts on; the background reader only logs them.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};
use tvremote_core::protocol::legacy::{self, AuthReply, LegacyReply};
use tvremote_core::{CommandCode, CommandEncoder, Endpoint, LegacyEncoder, ProtocolError, TransportKind};

use super::CONNECT_TIMEOUT;
use crate::application::transport::{ConnectionError, Transport};

/// Transport speaking the legacy length-prefixed binary protocol.
pub struct SocketTransport {
    endpoint: Endpoint,
    encoder: LegacyEncoder,
    writer: Option<OwnedWriteHalf>,
    reader: Option<JoinHandle<()>>,
    alive: Arc<AtomicBool>,
}

impl SocketTransport {
    /// Creates an unopened transport for `endpoint`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            encoder: LegacyEncoder,
            writer: None,
            reader: None,
            alive: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `host:port` with the port resolved (port `0` becomes 55000).
    pub fn target(&self) -> String {
        self.endpoint.socket_target(TransportKind::Socket)
    }

    /// Connects and runs the authentication exchange.
    ///
    /// Returns both halves of the stream plus any bytes read past the
    /// authentication reply.
    async fn connect_and_authenticate(
        &self,
        target: &str,
    ) -> Result<(OwnedReadHalf, OwnedWriteHalf, Vec<u8>), ConnectionError> {
        let connect_failed = |source: std::io::Error| ConnectionError::ConnectFailed {
            target: target.to_string(),
            source: Box::new(source),
        };

        let stream = TcpStream::connect(target).await.map_err(connect_failed)?;
        let local_ip = stream.local_addr().map_err(connect_failed)?.ip().to_string();
        let packet = legacy::auth_packet(
            &local_ip,
            self.endpoint.device_identity(),
            self.endpoint.app_identity(),
        )?;

        let (mut read_half, mut write_half) = stream.into_split();
        write_half.write_all(&packet).await.map_err(connect_failed)?;

        let (reply, leftover) = read_reply(&mut read_half, Vec::new())
            .await
            .map_err(|e| match e {
                ReadError::Io(io) => connect_failed(io),
                ReadError::Protocol(p) => ConnectionError::Protocol(p),
            })?;

        match AuthReply::from_payload(&reply.payload) {
            AuthReply::Granted => Ok((read_half, write_half, leftover)),
            AuthReply::Denied => Err(ConnectionError::AccessDenied),
            AuthReply::AwaitingApproval => Err(ConnectionError::AwaitingApproval),
            AuthReply::ApprovalTimeout => Err(ConnectionError::ApprovalTimeout),
            AuthReply::Unexpected(payload) => Err(ConnectionError::UnexpectedReply(payload)),
        }
    }
}

#[async_trait]
impl Transport for SocketTransport {
    async fn open(&mut self) -> Result<(), ConnectionError> {
        if self.is_open() {
            return Ok(());
        }

        let target = self.target();
        debug!("open connection to host '{target}' using legacy socket protocol");

        let (read_half, write_half, leftover) =
            match timeout(CONNECT_TIMEOUT, self.connect_and_authenticate(&target)).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(ConnectionError::Timeout {
                        target,
                        budget: CONNECT_TIMEOUT,
                    })
                }
            };

        let alive = Arc::new(AtomicBool::new(true));
        self.reader = Some(tokio::spawn(read_replies(
            read_half,
            leftover,
            Arc::clone(&alive),
            target,
        )));
        self.alive = alive;
        self.writer = Some(write_half);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        self.alive.store(false, Ordering::Release);

        let result = writer.shutdown().await;
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(ConnectionError::Close {
                source: Box::new(e),
            }),
        }
    }

    async fn transmit(&mut self, command: &CommandCode) -> Result<(), ConnectionError> {
        if !self.is_open() {
            return Err(ConnectionError::NotOpen);
        }
        let Some(writer) = self.writer.as_mut() else {
            return Err(ConnectionError::NotOpen);
        };

        let packet = self.encoder.encode(command)?;
        debug!("sending key code {command}");
        if let Err(e) = writer.write_all(&packet).await {
            self.alive.store(false, Ordering::Release);
            return Err(ConnectionError::Send {
                source: Box::new(e),
            });
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.writer.is_some() && self.alive.load(Ordering::Acquire)
    }
}

impl Drop for SocketTransport {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

enum ReadError {
    Io(std::io::Error),
    Protocol(ProtocolError),
}

/// Reads until one complete reply is buffered.
///
/// `buf` holds bytes already received; the bytes following the reply are
/// returned for the next call.
async fn read_reply(
    read_half: &mut OwnedReadHalf,
    mut buf: Vec<u8>,
) -> Result<(LegacyReply, Vec<u8>), ReadError> {
    let mut read_tmp = [0u8; 512];
    loop {
        match legacy::decode_reply(&buf) {
            Ok((reply, consumed)) => {
                buf.drain(..consumed);
                return Ok((reply, buf));
            }
            Err(ProtocolError::InsufficientData { .. }) => {}
            Err(e) => return Err(ReadError::Protocol(e)),
        }

        let n = read_half.read(&mut read_tmp).await.map_err(ReadError::Io)?;
        if n == 0 {
            return Err(ReadError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed by TV",
            )));
        }
        buf.extend_from_slice(&read_tmp[..n]);
    }
}

/// Logs every reply the TV sends until the connection ends.
async fn read_replies(
    mut read_half: OwnedReadHalf,
    mut buf: Vec<u8>,
    alive: Arc<AtomicBool>,
    target: String,
) {
    loop {
        match read_reply(&mut read_half, buf).await {
            Ok((reply, rest)) => {
                debug!(
                    "message from TV {target}: kind={:#04x} app={} payload={:02X?}",
                    reply.kind, reply.app, reply.payload
                );
                buf = rest;
            }
            Err(ReadError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!("TV {target} closed the connection");
                break;
            }
            Err(ReadError::Io(e)) => {
                warn!("read from TV {target} failed: {e}");
                break;
            }
            Err(ReadError::Protocol(e)) => {
                warn!("undecodable reply from TV {target}: {e}");
                break;
            }
        }
    }
    alive.store(false, Ordering::Release);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_resolves_default_port() {
        let ep = Endpoint::new("tv.local", 0, "app", "dev").unwrap();
        assert_eq!(SocketTransport::new(ep).target(), "tv.local:55000");
    }

    #[tokio::test]
    async fn test_close_on_unopened_transport_is_noop() {
        let ep = Endpoint::new("tv.local", 0, "app", "dev").unwrap();
        let mut transport = SocketTransport::new(ep);

        transport.close().await.unwrap();

        assert!(!transport.is_open());
    }

    #[tokio::test]
    async fn test_transmit_on_unopened_transport_is_not_open_error() {
        let ep = Endpoint::new("tv.local", 0, "app", "dev").unwrap();
        let mut transport = SocketTransport::new(ep);

        let result = transport.transmit(&CommandCode::from_static("KEY_POWER")).await;

        assert!(matches!(result, Err(ConnectionError::NotOpen)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_connect_failed() {
        // Bind and drop a listener to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let ep = Endpoint::new("127.0.0.1", port, "app", "dev").unwrap();
        let mut transport = SocketTransport::new(ep);

        let result = transport.open().await;

        assert!(matches!(result, Err(ConnectionError::ConnectFailed { .. })));
        assert!(!transport.is_open());
    }
}
