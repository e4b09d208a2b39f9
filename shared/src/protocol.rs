//! Wire protocol. Every event travels as one JSON text frame of the form
//! `{"event": "<name>", "data": {...}}`. The transport's own connect and
//! close signals stand in for the `connect` and `disconnect` events.
//!
//! Coordinates must be finite `f32`s. JSON numbers past `f32::MAX` would
//! otherwise decode to infinity and re-encode as `null`, so they are rejected
//! as malformed.

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::PlayerId;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed payload: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("failed to encode packet: {0}")]
    Encode(#[source] serde_json::Error),
}

fn finite<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    let value = f32::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom("coordinate out of range"))
    }
}

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientPacket {
    /// Registers the sender as a player at the given spawn position.
    #[serde(rename = "new player")]
    Join {
        #[serde(deserialize_with = "finite")]
        x: f32,
        #[serde(deserialize_with = "finite")]
        y: f32,
    },
    #[serde(rename = "move player")]
    Move {
        #[serde(deserialize_with = "finite")]
        x: f32,
        #[serde(deserialize_with = "finite")]
        y: f32,
    },
}

/// Events the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerPacket {
    #[serde(rename = "new player")]
    NewPlayer {
        id: PlayerId,
        #[serde(deserialize_with = "finite")]
        x: f32,
        #[serde(deserialize_with = "finite")]
        y: f32,
    },
    #[serde(rename = "move player")]
    MovePlayer {
        id: PlayerId,
        #[serde(deserialize_with = "finite")]
        x: f32,
        #[serde(deserialize_with = "finite")]
        y: f32,
    },
    #[serde(rename = "remove player")]
    RemovePlayer { id: PlayerId },
}

impl ClientPacket {
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Malformed)
    }
}

impl ServerPacket {
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Malformed)
    }

    /// The player this event is about.
    pub fn player_id(&self) -> PlayerId {
        match self {
            ServerPacket::NewPlayer { id, .. }
            | ServerPacket::MovePlayer { id, .. }
            | ServerPacket::RemovePlayer { id } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn as_value(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_join_wire_format() {
        let text = ClientPacket::Join { x: 10.0, y: 20.0 }.encode().unwrap();
        assert_eq!(
            as_value(&text),
            json!({"event": "new player", "data": {"x": 10.0, "y": 20.0}})
        );
    }

    #[test]
    fn test_client_move_wire_format() {
        let text = ClientPacket::Move { x: 1.5, y: -3.0 }.encode().unwrap();
        assert_eq!(
            as_value(&text),
            json!({"event": "move player", "data": {"x": 1.5, "y": -3.0}})
        );
    }

    #[test]
    fn test_server_packets_wire_format() {
        let new_player = ServerPacket::NewPlayer {
            id: PlayerId(2),
            x: 30.0,
            y: 40.0,
        };
        assert_eq!(
            as_value(&new_player.encode().unwrap()),
            json!({"event": "new player", "data": {"id": 2, "x": 30.0, "y": 40.0}})
        );

        let remove = ServerPacket::RemovePlayer { id: PlayerId(1) };
        assert_eq!(
            as_value(&remove.encode().unwrap()),
            json!({"event": "remove player", "data": {"id": 1}})
        );
    }

    #[test]
    fn test_decode_integer_coordinates() {
        let packet = ClientPacket::decode(r#"{"event":"move player","data":{"x":35,"y":40}}"#)
            .unwrap();
        assert_eq!(packet, ClientPacket::Move { x: 35.0, y: 40.0 });
    }

    #[test]
    fn test_decode_server_move() {
        let packet =
            ServerPacket::decode(r#"{"event":"move player","data":{"id":9,"x":1,"y":2}}"#)
                .unwrap();
        assert_eq!(packet.player_id(), PlayerId(9));
        assert_eq!(
            packet,
            ServerPacket::MovePlayer {
                id: PlayerId(9),
                x: 1.0,
                y: 2.0
            }
        );
    }

    #[test]
    fn test_decode_rejects_unknown_event() {
        let result = ClientPacket::decode(r#"{"event":"teleport","data":{"x":1,"y":2}}"#);
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let result = ClientPacket::decode(r#"{"event":"move player","data":{"x":1}}"#);
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_ill_typed_field() {
        let result = ClientPacket::decode(r#"{"event":"new player","data":{"x":"1","y":2}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_coordinates_beyond_f32() {
        let join = ClientPacket::decode(r#"{"event":"new player","data":{"x":1e39,"y":0.1}}"#);
        assert!(matches!(join, Err(ProtocolError::Malformed(_))));

        let movement = ClientPacket::decode(r#"{"event":"move player","data":{"x":1,"y":-1e39}}"#);
        assert!(matches!(movement, Err(ProtocolError::Malformed(_))));

        let relayed =
            ServerPacket::decode(r#"{"event":"move player","data":{"id":1,"x":1e39,"y":0}}"#);
        assert!(matches!(relayed, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_decode_accepts_large_finite_coordinates() {
        // 2^120, exact in both f64 and f32.
        let text = r#"{"event":"move player","data":{"x":-1329227995784915872903807060280344576,"y":0.5}}"#;
        let packet = ClientPacket::decode(text).unwrap();
        assert_eq!(
            packet,
            ClientPacket::Move {
                x: -(2f32.powi(120)),
                y: 0.5
            }
        );
    }

    #[test]
    fn test_decode_rejects_server_only_event_from_client() {
        let result = ClientPacket::decode(r#"{"event":"remove player","data":{"id":1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(ServerPacket::decode("not json").is_err());
        assert!(ServerPacket::decode("").is_err());
    }
}
