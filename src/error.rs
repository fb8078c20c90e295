//! Error types
//!
//! `ApiError` covers every failed query, mutation or HTTP exchange.
//! `TokenError` only ever means "not signed in".

use graphql_ws::GraphqlError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("{}", .0.join("; "))]
    Graphql(Vec<String>),
    #[error("not authenticated")]
    Unauthenticated,
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify the `errors` array of a GraphQL response
    pub fn from_graphql(errors: &[GraphqlError]) -> Self {
        if errors.iter().any(|e| e.code() == Some("UNAUTHENTICATED")) {
            return ApiError::Unauthenticated;
        }
        ApiError::Graphql(errors.iter().map(|e| e.message.clone()).collect())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ApiError::Status(status.as_u16());
        }
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        ApiError::Network(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    #[error("no stored token")]
    Missing,
    #[error("token is not a JWT")]
    Malformed,
    #[error("token payload is not base64url: {0}")]
    Encoding(String),
    #[error("token claims unreadable: {0}")]
    Claims(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gql_error(message: &str, code: Option<&str>) -> GraphqlError {
        GraphqlError {
            message: message.to_string(),
            path: None,
            extensions: code.map(|c| json!({ "code": c })),
        }
    }

    #[test]
    fn test_unauthenticated_code_wins() {
        let errors = vec![gql_error("boom", None), gql_error("who are you", Some("UNAUTHENTICATED"))];
        assert_eq!(ApiError::from_graphql(&errors), ApiError::Unauthenticated);
    }

    #[test]
    fn test_graphql_messages_joined() {
        let errors = vec![gql_error("a", None), gql_error("b", Some("BAD_USER_INPUT"))];
        let err = ApiError::from_graphql(&errors);
        assert_eq!(err.to_string(), "a; b");
    }
}
