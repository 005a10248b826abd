//! Websocket (text-frame) transport.
//!
//! Connects to
//! `ws://{host}:{port}/api/v2/channels/samsung.remote.control?name={app}`
//! and sends one JSON text frame per key press.  The device identity of the
//! endpoint is not part of this protocol and is ignored.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, Error as WsError, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};
use tvremote_core::protocol::websocket::connection_url;
use tvremote_core::{CommandCode, CommandEncoder, Endpoint, ProtocolError, WebsocketEncoder};

use super::CONNECT_TIMEOUT;
use crate::application::transport::{ConnectionError, Transport};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport speaking the `ms.remote.control` JSON protocol.
pub struct WebsocketTransport {
    endpoint: Endpoint,
    encoder: WebsocketEncoder,
    sink: Option<SplitSink<WsStream, WsMessage>>,
    reader: Option<JoinHandle<()>>,
    alive: Arc<AtomicBool>,
}

impl WebsocketTransport {
    /// Creates an unopened transport for `endpoint`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            encoder: WebsocketEncoder,
            sink: None,
            reader: None,
            alive: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The URL this transport connects to, with the port resolved.
    pub fn url(&self) -> String {
        connection_url(&self.endpoint)
    }
}

#[async_trait]
impl Transport for WebsocketTransport {
    async fn open(&mut self) -> Result<(), ConnectionError> {
        if self.is_open() {
            return Ok(());
        }

        let url = self.url();
        let request = url
            .as_str()
            .into_client_request()
            .map_err(|e| ProtocolError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        debug!("trying to open websocket to: {url}");
        let (stream, _response) = match timeout(CONNECT_TIMEOUT, connect_async(request)).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                return Err(ConnectionError::ConnectFailed {
                    target: url,
                    source: Box::new(e),
                })
            }
            Err(_) => {
                return Err(ConnectionError::Timeout {
                    target: url,
                    budget: CONNECT_TIMEOUT,
                })
            }
        };

        let (sink, stream) = stream.split();
        let alive = Arc::new(AtomicBool::new(true));
        self.reader = Some(tokio::spawn(read_frames(stream, Arc::clone(&alive), url)));
        self.alive = alive;
        self.sink = Some(sink);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        let Some(mut sink) = self.sink.take() else {
            return Ok(());
        };
        self.alive.store(false, Ordering::Release);

        // Sends a Close frame, then flushes and shuts the write side.
        let result = sink.close().await;
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }

        match result {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(ConnectionError::Close {
                source: Box::new(e),
            }),
        }
    }

    async fn transmit(&mut self, command: &CommandCode) -> Result<(), ConnectionError> {
        if !self.is_open() {
            return Err(ConnectionError::NotOpen);
        }
        let Some(sink) = self.sink.as_mut() else {
            return Err(ConnectionError::NotOpen);
        };

        let frame = self.encoder.encode(command)?;
        debug!("sending key code {command}");
        if let Err(e) = sink.send(WsMessage::Text(frame)).await {
            self.alive.store(false, Ordering::Release);
            return Err(ConnectionError::Send {
                source: Box::new(e),
            });
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.sink.is_some() && self.alive.load(Ordering::Acquire)
    }
}

impl Drop for WebsocketTransport {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Logs every frame the TV sends until the connection ends.
async fn read_frames(mut stream: SplitStream<WsStream>, alive: Arc<AtomicBool>, url: String) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => debug!("message from TV: {text}"),
            Ok(WsMessage::Binary(bytes)) => {
                debug!("binary message from TV ({} bytes)", bytes.len())
            }
            Ok(WsMessage::Close(reason)) => {
                debug!("TV closed websocket {url}: {reason:?}");
                break;
            }
            // Ping/Pong are answered by tungstenite.
            Ok(_) => {}
            Err(e) => {
                warn!("websocket {url} read failed: {e}");
                break;
            }
        }
    }
    alive.store(false, Ordering::Release);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
