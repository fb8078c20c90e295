//! GraphQL WebSocket Subscriptions
//!
//! Minimal browser client for the `graphql-transport-ws` sub-protocol.
//! One `subscribe` call owns one socket and one operation, and reconnects
//! with exponential backoff when the socket drops.

mod backoff;
mod client;
mod protocol;

pub use backoff::ReconnectPolicy;
pub use client::{subscribe, ConnectOptions, SubscriptionEvent, SubscriptionHandle};
pub use protocol::{ClientMessage, ExecutionResult, GraphqlError, ServerMessage, SubscribePayload, SUBPROTOCOL};

use thiserror::Error;

/// Failures of the subscription channel
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubscriptionError {
    #[error("could not open websocket: {0}")]
    Connect(String),
    #[error("could not send message: {0}")]
    Send(String),
    #[error("unexpected server message: {0}")]
    Protocol(String),
    #[error("operation rejected: {}", join_messages(.0))]
    Rejected(Vec<GraphqlError>),
    #[error("gave up after {0} reconnect attempts")]
    Exhausted(u32),
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
