//! User Session
//!
//! Reads the credential token from browser storage once at startup and
//! decodes its payload into a `User`. Signature checks are the server's job.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::error::TokenError;
use crate::models::User;

/// Where the credential token lives
pub trait CredentialStore {
    fn load(&self, key: &str) -> Option<String>;
}

/// `window.localStorage`
pub struct LocalStorage;

impl CredentialStore for LocalStorage {
    fn load(&self, key: &str) -> Option<String> {
        web_sys::window()?
            .local_storage()
            .ok()??
            .get_item(key)
            .ok()?
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated(User),
}

impl Session {
    /// Resolve the session from stored credentials
    pub fn restore(store: &impl CredentialStore, key: &str) -> Self {
        let token = match store.load(key).filter(|t| !t.trim().is_empty()) {
            Some(token) => token,
            None => {
                log::debug!("[SESSION] {}", TokenError::Missing);
                return Session::Unauthenticated;
            }
        };
        match decode_token(&token) {
            Ok(user) => {
                log::info!("[SESSION] signed in as {}", user.username);
                Session::Authenticated(user)
            }
            Err(err) => {
                log::debug!("[SESSION] ignoring stored token: {}", err);
                Session::Unauthenticated
            }
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.user().map(|user| user.jwt.as_str())
    }
}

#[derive(Deserialize)]
struct Claims {
    id: i64,
    username: String,
}

/// Decode the payload segment of a JWT into a user
pub fn decode_token(token: &str) -> Result<User, TokenError> {
    let token = token.trim();
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts[1].is_empty() {
        return Err(TokenError::Malformed);
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| TokenError::Encoding(e.to_string()))?;
    let claims: Claims = serde_json::from_slice(&payload).map_err(|e| TokenError::Claims(e.to_string()))?;

    Ok(User {
        id: claims.id,
        username: claims.username,
        jwt: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct MemoryStore(HashMap<String, String>);

    impl CredentialStore for MemoryStore {
        fn load(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    fn make_test_jwt(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}");
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let signature = URL_SAFE_NO_PAD.encode(b"sig");
        format!("{header}.{payload}.{signature}")
    }

    fn store_with(token: &str) -> MemoryStore {
        MemoryStore(HashMap::from([("token".to_string(), token.to_string())]))
    }

    #[test]
    fn test_decode_token() {
        let jwt = make_test_jwt(json!({ "id": 7, "username": "alice", "iat": 1600000000 }));
        let user = decode_token(&jwt).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.username, "alice");
        assert_eq!(user.jwt, jwt);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode_token("not-a-jwt"), Err(TokenError::Malformed));
        assert!(matches!(decode_token("a.***.c"), Err(TokenError::Encoding(_))));
        let jwt = make_test_jwt(json!({ "sub": "alice" }));
        assert!(matches!(decode_token(&jwt), Err(TokenError::Claims(_))));
    }

    #[test]
    fn test_restore_authenticated() {
        let jwt = make_test_jwt(json!({ "id": 3, "username": "carol" }));
        let session = Session::restore(&store_with(&jwt), "token");
        assert_eq!(session.user().map(|u| u.username.as_str()), Some("carol"));
        assert_eq!(session.token(), Some(jwt.as_str()));
    }

    #[test]
    fn test_restore_without_token() {
        let empty = MemoryStore(HashMap::new());
        assert_eq!(Session::restore(&empty, "token"), Session::Unauthenticated);
        assert_eq!(Session::restore(&store_with("  "), "token"), Session::Unauthenticated);
        assert_eq!(Session::restore(&store_with("x.y"), "token"), Session::Unauthenticated);
    }
}
