//! Wire messages of `graphql-transport-ws`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sub-protocol name sent in the WebSocket handshake
pub const SUBPROTOCOL: &str = "graphql-transport-ws";

/// Error entry of a GraphQL response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphqlError {
    /// `extensions.code`, when the server set one
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }
}

/// Payload of a `subscribe` message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribePayload {
    pub query: String,
    pub variables: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// `{data, errors}` as carried by `next`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ConnectionInit {
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Subscribe {
        id: String,
        payload: SubscribePayload,
    },
    Complete {
        id: String,
    },
    /// Reply to a server `ping`
    Pong,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ConnectionAck,
    Next {
        id: String,
        payload: ExecutionResult,
    },
    Error {
        id: String,
        payload: Vec<GraphqlError>,
    },
    Complete {
        id: String,
    },
    Ping,
    Pong,
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    pub fn to_text(&self) -> String {
        // Serializing these shapes cannot fail: all keys are strings.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscribe_message_shape() {
        let msg = ClientMessage::Subscribe {
            id: "1".to_string(),
            payload: SubscribePayload {
                query: "subscription { x }".to_string(),
                variables: json!({ "listId": "7" }),
                operation_name: Some("OnListItemChanged".to_string()),
            },
        };
        let value: Value = serde_json::from_str(&msg.to_text()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "subscribe",
                "id": "1",
                "payload": {
                    "query": "subscription { x }",
                    "variables": { "listId": "7" },
                    "operationName": "OnListItemChanged"
                }
            })
        );
    }

    #[test]
    fn test_connection_init_without_payload() {
        let text = ClientMessage::ConnectionInit { payload: None }.to_text();
        assert_eq!(text, r#"{"type":"connection_init"}"#);
        assert_eq!(ClientMessage::Pong.to_text(), r#"{"type":"pong"}"#);
    }

    #[test]
    fn test_parse_next_with_data() {
        let raw = r#"{"type":"next","id":"1","payload":{"data":{"listItemChanged":{"id":"3"}}}}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        match msg {
            ServerMessage::Next { id, payload } => {
                assert_eq!(id, "1");
                assert_eq!(payload.data, Some(json!({ "listItemChanged": { "id": "3" } })));
                assert!(payload.errors.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_and_unknown() {
        let raw = r#"{"type":"error","id":"1","payload":[{"message":"denied","extensions":{"code":"FORBIDDEN"}}]}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        let ServerMessage::Error { payload, .. } = msg else {
            panic!("expected error message");
        };
        assert_eq!(payload[0].code(), Some("FORBIDDEN"));

        let msg: ServerMessage = serde_json::from_str(r#"{"type":"ka"}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
        let msg: ServerMessage = serde_json::from_str(r#"{"type":"connection_ack"}"#).unwrap();
        assert_eq!(msg, ServerMessage::ConnectionAck);
    }
}
