//! JSON envelope and connection URL of the websocket remote-control channel.
//!
//! Wire format of one key press (field order and casing are significant to
//! some TV firmware):
//!
//! ```text
//! {"method":"ms.remote.control","params":{"Cmd":"Click","DataOfCmd":"KEY_POWER","Option":"false","TypeOfRemote":"SendRemoteKey"}}
//! ```

use serde::Serialize;

use crate::domain::command::CommandCode;
use crate::domain::endpoint::{Endpoint, TransportKind};
use crate::protocol::{CommandEncoder, ProtocolError};

/// Channel path of the remote-control service.
pub const CHANNEL_PATH: &str = "/api/v2/channels/samsung.remote.control";

/// Builds `ws://{host}:{port}/api/v2/channels/samsung.remote.control?name={app}`.
///
/// The port sentinel `0` is resolved to 8001 here, at connection time.  The
/// app name is percent-encoded, so the TV sees it exactly as configured.
pub fn connection_url(endpoint: &Endpoint) -> String {
    format!(
        "ws://{}:{}{}?name={}",
        endpoint.host(),
        endpoint.resolved_port(TransportKind::Websocket),
        CHANNEL_PATH,
        urlencoding::encode(endpoint.app_identity())
    )
}

#[derive(Serialize)]
struct RemoteControlFrame<'a> {
    method: &'static str,
    params: RemoteControlParams<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteControlParams<'a> {
    cmd: &'static str,
    data_of_cmd: &'a str,
    option: &'static str,
    type_of_remote: &'static str,
}

/// Encodes key presses as `ms.remote.control` JSON text frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebsocketEncoder;

impl CommandEncoder for WebsocketEncoder {
    type Frame = String;

    fn encode(&self, command: &CommandCode) -> Result<String, ProtocolError> {
        let frame = RemoteControlFrame {
            method: "ms.remote.control",
            params: RemoteControlParams {
                cmd: "Click",
                data_of_cmd: command.wire_value(),
                option: "false",
                type_of_remote: "SendRemoteKey",
            },
        };
        serde_json::to_string(&frame).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
