//! GraphQL API
//!
//! Typed operations over HTTP plus the list-item subscription.

mod operations;
mod subscriptions;

pub use operations::*;
pub use subscriptions::*;

use graphql_ws::GraphqlError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// A named document with typed variables and result
pub trait Operation {
    const NAME: &'static str;
    const DOCUMENT: &'static str;
    type Variables: Serialize;
    type Data: DeserializeOwned;
}

/// Stateless HTTP client; one instance per signed-in session
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: String,
    token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a, V> {
    query: &'a str,
    variables: &'a V,
    operation_name: &'a str,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
        }
    }

    pub async fn execute<O: Operation>(&self, variables: &O::Variables) -> Result<O::Data, ApiError> {
        log::debug!("[GQL] {}", O::NAME);
        let body = RequestBody {
            query: O::DOCUMENT,
            variables,
            operation_name: O::NAME,
        };
        let mut request = reqwest::Client::new().post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        decode_response(status, &text).inspect_err(|e| log::warn!("[GQL] {} failed: {}", O::NAME, e))
    }
}

/// Decode a GraphQL-over-HTTP response. Reported errors take precedence
/// over any partial data.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if status == 401 => return Err(ApiError::Unauthenticated),
        Err(_) if !(200..300).contains(&status) => return Err(ApiError::Status(status)),
        Err(e) => return Err(ApiError::Decode(e.to_string())),
    };

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        return Err(ApiError::from_graphql(&errors));
    }
    match envelope.data {
        Some(data) if !data.is_null() => serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string())),
        _ if !(200..300).contains(&status) => Err(ApiError::Status(status)),
        _ => Err(ApiError::Decode("response carried no data".to_string())),
    }
}
