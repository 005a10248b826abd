//! Selects the transport implementation from configuration.

use std::sync::Arc;

use tvremote_core::{Endpoint, TransportKind};

use crate::application::pacing::Pacer;
use crate::application::remote_controller::RemoteControllerClient;
use crate::application::transport::{Transport, TransportFactory};
use crate::infrastructure::transport::{SocketTransport, WebsocketTransport};

/// Creates transports of one [`TransportKind`] for one [`Endpoint`].
#[derive(Debug, Clone)]
pub struct EndpointTransportFactory {
    endpoint: Endpoint,
    kind: TransportKind,
}

impl EndpointTransportFactory {
    pub fn new(endpoint: Endpoint, kind: TransportKind) -> Self {
        Self { endpoint, kind }
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }
}

impl TransportFactory for EndpointTransportFactory {
    fn create(&self) -> Box<dyn Transport> {
        match self.kind {
            TransportKind::Websocket => Box::new(WebsocketTransport::new(self.endpoint.clone())),
            TransportKind::Socket => Box::new(SocketTransport::new(self.endpoint.clone())),
        }
    }

    fn target(&self) -> String {
        format!("{} ({})", self.endpoint.socket_target(self.kind), self.kind)
    }
}

/// Builds a disconnected client for `endpoint` speaking `kind`.
pub fn build_remote_controller(
    endpoint: Endpoint,
    kind: TransportKind,
    pacer: Arc<dyn Pacer>,
) -> RemoteControllerClient {
    RemoteControllerClient::new(Box::new(EndpointTransportFactory::new(endpoint, kind)), pacer)
}
