//! Binary framing of the legacy socket remote-control protocol (port 55000).
//!
//! Every packet has the same outer layout.  All lengths are little-endian
//! `u16`; identity strings and key names inside the payload are base64 of
//! their UTF-8 bytes.
//!
//! ```text
//! [kind:1][app_len:2][app:app_len][payload_len:2][payload:payload_len]
//! ```
//!
//! | Packet | app                    | payload                                              |
//! |--------|------------------------|------------------------------------------------------|
//! | auth   | `iphone.iapp.samsung`  | `64 00` + b64(local ip) + b64(device id) + b64(app)  |
//! | key    | `iphone..iapp.samsung` | `00 00 00` + b64(key)                                |
//!
//! Each base64 field inside a payload carries its own `u16` length prefix.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::domain::command::CommandCode;
use crate::protocol::{CommandEncoder, ProtocolError};

/// App string of the authentication packet.
pub const AUTH_APP: &str = "iphone.iapp.samsung";

/// App string of key packets.  The double dot is what the TV expects.
pub const KEY_APP: &str = "iphone..iapp.samsung";

/// Size of the fixed part of a reply: kind byte plus the app length prefix.
const REPLY_PREFIX_LEN: usize = 3;

const GRANTED: &[u8] = &[0x64, 0x00, 0x01, 0x00];
const DENIED: &[u8] = &[0x64, 0x00, 0x00, 0x00];
const AWAITING: &[&[u8]] = &[
    &[0x0A, 0x00, 0x02, 0x00, 0x00, 0x00],
    &[0x0A, 0x00, 0x01, 0x00, 0x00, 0x00],
];
const APPROVAL_TIMEOUT: &[u8] = &[0x65, 0x00];

/// Builds the authentication packet sent right after the TCP connect.
///
/// # Errors
///
/// Returns [`ProtocolError::FieldTooLong`] if a field exceeds `u16::MAX`
/// bytes after base64 encoding.
pub fn auth_packet(
    local_ip: &str,
    device_identity: &str,
    app_identity: &str,
) -> Result<Vec<u8>, ProtocolError> {
    let mut payload = vec![0x64, 0x00];
    put_base64(&mut payload, "local_ip", local_ip)?;
    put_base64(&mut payload, "device_identity", device_identity)?;
    put_base64(&mut payload, "app_identity", app_identity)?;
    wrap(AUTH_APP, &payload)
}

/// Encodes key presses as legacy key packets.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyEncoder;

impl CommandEncoder for LegacyEncoder {
    type Frame = Vec<u8>;

    fn encode(&self, command: &CommandCode) -> Result<Vec<u8>, ProtocolError> {
        let mut payload = vec![0x00, 0x00, 0x00];
        put_base64(&mut payload, "key", command.wire_value())?;
        wrap(KEY_APP, &payload)
    }
}

/// One reply packet read from the TV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyReply {
    pub kind: u8,
    pub app: String,
    pub payload: Vec<u8>,
}

/// Meaning of the payload of a reply to the authentication packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthReply {
    Granted,
    Denied,
    /// The TV shows an "allow this device" prompt that has not been answered.
    AwaitingApproval,
    /// The prompt was shown and nobody answered it in time.
    ApprovalTimeout,
    Unexpected(Vec<u8>),
}

impl AuthReply {
    pub fn from_payload(payload: &[u8]) -> Self {
        if payload == GRANTED {
            AuthReply::Granted
        } else if payload == DENIED {
            AuthReply::Denied
        } else if AWAITING.contains(&payload) {
            AuthReply::AwaitingApproval
        } else if payload == APPROVAL_TIMEOUT {
            AuthReply::ApprovalTimeout
        } else {
            AuthReply::Unexpected(payload.to_vec())
        }
    }
}

/// Decodes one reply from the front of `buf`.
///
/// Returns the reply and the number of bytes it occupied.  Bytes after the
/// reply are left for the next call.
///
/// # Errors
///
/// Returns [`ProtocolError::InsufficientData`] when `buf` does not yet hold a
/// complete reply; the caller should read more bytes and try again.
pub fn decode_reply(buf: &[u8]) -> Result<(LegacyReply, usize), ProtocolError> {
    if buf.len() < REPLY_PREFIX_LEN {
        return Err(ProtocolError::InsufficientData {
            needed: REPLY_PREFIX_LEN,
            available: buf.len(),
        });
    }
    let kind = buf[0];
    let app_len = u16::from_le_bytes([buf[1], buf[2]]) as usize;

    let payload_len_at = REPLY_PREFIX_LEN + app_len;
    if buf.len() < payload_len_at + 2 {
        return Err(ProtocolError::InsufficientData {
            needed: payload_len_at + 2,
            available: buf.len(),
        });
    }
    let payload_len = u16::from_le_bytes([buf[payload_len_at], buf[payload_len_at + 1]]) as usize;

    let total = payload_len_at + 2 + payload_len;
    if buf.len() < total {
        return Err(ProtocolError::InsufficientData {
            needed: total,
            available: buf.len(),
        });
    }

    let app = String::from_utf8_lossy(&buf[REPLY_PREFIX_LEN..payload_len_at]).into_owned();
    let payload = buf[payload_len_at + 2..total].to_vec();
    Ok((LegacyReply { kind, app, payload }, total))
}

fn wrap(app: &str, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut packet = Vec::with_capacity(1 + 2 + app.len() + 2 + payload.len());
    packet.push(0x00);
    put_field(&mut packet, "app", app.as_bytes())?;
    put_field(&mut packet, "payload", payload)?;
    Ok(packet)
}

fn put_base64(buf: &mut Vec<u8>, field: &'static str, value: &str) -> Result<(), ProtocolError> {
    put_field(buf, field, STANDARD.encode(value).as_bytes())
}

fn put_field(buf: &mut Vec<u8>, field: &'static str, bytes: &[u8]) -> Result<(), ProtocolError> {
    let len = u16::try_from(bytes.len()).map_err(|_| ProtocolError::FieldTooLong {
        field,
        len: bytes.len(),
        max: u16::MAX as usize,
    })?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(bytes);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
