//! `graphql-ws` subprotocol frames.
//!
//! Every frame is a JSON text message tagged by `type`. The client opens with
//! `connection_init`, waits for `connection_ack`, then multiplexes operations
//! by `id`. The server may send `ka` keep-alives at any time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{GraphQlRequest, GraphQlResponse};

/// `Sec-WebSocket-Protocol` value this subprotocol is negotiated under.
pub const SUBPROTOCOL: &str = "graphql-ws";

/// Frames sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Open the session.
    ConnectionInit {
        /// Connection parameters (auth headers and the like).
        #[serde(default)]
        payload: Value,
    },
    /// Start an operation.
    Start {
        /// Client-chosen operation identifier.
        id: String,
        /// Operation body.
        payload: GraphQlRequest,
    },
    /// Stop an operation.
    Stop {
        /// Identifier given in `start`.
        id: String,
    },
    /// Close the session.
    ConnectionTerminate,
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Session accepted.
    ConnectionAck,
    /// Session rejected.
    ConnectionError {
        /// Server diagnostic.
        #[serde(default)]
        payload: Value,
    },
    /// Keep-alive.
    Ka,
    /// One result of a running operation.
    Data {
        /// Operation identifier.
        id: String,
        /// Result body.
        payload: GraphQlResponse,
    },
    /// Operation failed before execution (validation and the like).
    Error {
        /// Operation identifier.
        id: String,
        /// Server diagnostic.
        #[serde(default)]
        payload: Value,
    },
    /// Operation finished; no more `data` follows.
    Complete {
        /// Operation identifier.
        id: String,
    },
}

impl ClientMessage {
    /// Empty `connection_init`.
    pub fn init() -> Self {
        Self::ConnectionInit { payload: Value::Object(serde_json::Map::new()) }
    }

    /// JSON text of this frame.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ServerMessage {
    /// Parse a text frame.
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Best-effort description of a `connection_error` or `error` payload.
    pub fn describe_payload(payload: &Value) -> String {
        match payload {
            Value::String(s) => s.clone(),
            Value::Object(map) => match map.get("message") {
                Some(Value::String(s)) => s.clone(),
                _ => payload.to_string(),
            },
            Value::Array(items) => items
                .iter()
                .map(Self::describe_payload)
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
