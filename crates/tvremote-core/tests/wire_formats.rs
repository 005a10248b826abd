//! Integration tests for the tvremote-core wire formats.
//!
//! These tests drive both encoders through the public `CommandEncoder` trait
//! and check the bytes a TV would actually receive, together with the
//! endpoint rules that decide where those bytes go.

use tvremote_core::{
    protocol::{
        legacy::{self, AuthReply, KEY_APP},
        websocket::connection_url,
    },
    CommandCode, CommandEncoder, Endpoint, LegacyEncoder, ProtocolError, TransportKind,
    WebsocketEncoder,
};

/// Encodes every command with any encoder, in order.
fn encode_all<E: CommandEncoder>(encoder: &E, keys: &[&'static str]) -> Vec<E::Frame> {
    keys.iter()
        .map(|k| encoder.encode(&CommandCode::from_static(k)).expect("encode must succeed"))
        .collect()
}

#[test]
fn test_websocket_frames_carry_each_key_in_order() {
    // Arrange
    let keys = ["KEY_VOLUP", "KEY_VOLUP", "KEY_MUTE"];

    // Act
    let frames = encode_all(&WebsocketEncoder, &keys);

    // Assert
    for (frame, key) in frames.iter().zip(keys) {
        let value: serde_json::Value = serde_json::from_str(frame).expect("valid JSON");
        assert_eq!(value["method"], "ms.remote.control");
        assert_eq!(value["params"]["Cmd"], "Click");
        assert_eq!(value["params"]["DataOfCmd"], key);
        assert_eq!(value["params"]["Option"], "false");
        assert_eq!(value["params"]["TypeOfRemote"], "SendRemoteKey");
    }
}

#[test]
fn test_legacy_key_packets_decode_with_reply_framing() {
    // Arrange
    let frames = encode_all(&LegacyEncoder, &["KEY_POWER", "KEY_MUTE"]);
    let stream: Vec<u8> = frames.concat();

    // Act: split the concatenated stream back into packets.
    let (first, used) = legacy::decode_reply(&stream).expect("first packet");
    let (second, rest) = legacy::decode_reply(&stream[used..]).expect("second packet");

    // Assert
    assert_eq!(used + rest, stream.len());
    assert_eq!(first.app, KEY_APP);
    assert_eq!(second.app, KEY_APP);
    assert_eq!(&first.payload[..3], &[0x00, 0x00, 0x00]);
    assert_ne!(first.payload, second.payload);
}

#[test]
fn test_truncated_stream_asks_for_more_bytes() {
    let frame = LegacyEncoder.encode(&CommandCode::from_static("KEY_1")).unwrap();

    let result = legacy::decode_reply(&frame[..frame.len() - 1]);

    assert!(matches!(
        result,
        Err(ProtocolError::InsufficientData { needed, available })
            if needed == frame.len() && available == frame.len() - 1
    ));
}

#[test]
fn test_auth_reply_granted_only_for_exact_payload() {
    assert_eq!(AuthReply::from_payload(&[0x64, 0x00, 0x01, 0x00]), AuthReply::Granted);
    assert!(matches!(
        AuthReply::from_payload(&[0x64, 0x00, 0x01]),
        AuthReply::Unexpected(_)
    ));
}

#[test]
fn test_endpoint_port_resolution_per_transport() {
    let default_port = Endpoint::new("tv.local", 0, "app", "").unwrap();
    let explicit = Endpoint::new("tv.local", 7000, "app", "").unwrap();

    assert_eq!(default_port.resolved_port(TransportKind::Websocket), 8001);
    assert_eq!(default_port.resolved_port(TransportKind::Socket), 55000);
    assert_eq!(explicit.resolved_port(TransportKind::Websocket), 7000);
    assert_eq!(explicit.resolved_port(TransportKind::Socket), 7000);
}

#[test]
fn test_connection_url_ignores_device_identity() {
    let with_id = Endpoint::new("10.0.0.2", 0, "openhab", "remote-1").unwrap();
    let without_id = Endpoint::new("10.0.0.2", 0, "openhab", "").unwrap();

    assert_eq!(connection_url(&with_id), connection_url(&without_id));
    assert_eq!(
        connection_url(&with_id),
        "ws://10.0.0.2:8001/api/v2/channels/samsung.remote.control?name=openhab"
    );
}
