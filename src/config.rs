//! Application Configuration
//!
//! Defaults are derived from the page origin. A host page can override any
//! field by defining `window.__TODO_CONFIG__` before the bundle loads.

use graphql_ws::ReconnectPolicy;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

const GRAPHQL_PATH: &str = "/graphql";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub graphql_http_url: String,
    pub graphql_ws_url: String,
    /// localStorage key of the credential token
    pub token_storage_key: String,
    pub toast_duration_ms: u32,
    pub log_level: String,
    pub reconnect: ReconnectPolicy,
}

/// Partial config as supplied by the host page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub graphql_http_url: Option<String>,
    pub graphql_ws_url: Option<String>,
    pub token_storage_key: Option<String>,
    pub toast_duration_ms: Option<u32>,
    pub log_level: Option<String>,
    pub reconnect: Option<ReconnectPolicy>,
}

impl AppConfig {
    /// Defaults for a page served from `origin` (e.g. `https://todo.example.com`)
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        let ws_origin = if let Some(rest) = origin.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = origin.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            origin.to_string()
        };

        Self {
            graphql_http_url: option_env!("TODO_GRAPHQL_HTTP_URL")
                .map(String::from)
                .unwrap_or_else(|| format!("{}{}", origin, GRAPHQL_PATH)),
            graphql_ws_url: option_env!("TODO_GRAPHQL_WS_URL")
                .map(String::from)
                .unwrap_or_else(|| format!("{}{}", ws_origin, GRAPHQL_PATH)),
            token_storage_key: "token".to_string(),
            toast_duration_ms: 4_000,
            log_level: "info".to_string(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(v) = overrides.graphql_http_url {
            self.graphql_http_url = v;
        }
        if let Some(v) = overrides.graphql_ws_url {
            self.graphql_ws_url = v;
        }
        if let Some(v) = overrides.token_storage_key {
            self.token_storage_key = v;
        }
        if let Some(v) = overrides.toast_duration_ms {
            self.toast_duration_ms = v;
        }
        if let Some(v) = overrides.log_level {
            self.log_level = v;
        }
        if let Some(v) = overrides.reconnect {
            self.reconnect = v;
        }
        self
    }

    /// Build from the running page
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::for_origin("http://localhost");
        };
        let origin = window.location().origin().unwrap_or_else(|_| "http://localhost".to_string());
        let config = Self::for_origin(&origin);

        let raw = js_sys::Reflect::get(&window, &JsValue::from_str("__TODO_CONFIG__")).unwrap_or(JsValue::UNDEFINED);
        if raw.is_undefined() || raw.is_null() {
            return config;
        }
        match serde_wasm_bindgen::from_value::<ConfigOverrides>(raw) {
            Ok(overrides) => config.with_overrides(overrides),
            Err(e) => {
                // logger is not up yet
                web_sys::console::warn_1(&format!("[CONFIG] ignoring __TODO_CONFIG__: {}", e).into());
                config
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_follow_origin() {
        let config = AppConfig::for_origin("https://todo.example.com/");
        if option_env!("TODO_GRAPHQL_HTTP_URL").is_none() {
            assert_eq!(config.graphql_http_url, "https://todo.example.com/graphql");
        }
        if option_env!("TODO_GRAPHQL_WS_URL").is_none() {
            assert_eq!(config.graphql_ws_url, "wss://todo.example.com/graphql");
            assert_eq!(
                AppConfig::for_origin("http://localhost:8080").graphql_ws_url,
                "ws://localhost:8080/graphql"
            );
        }
        assert_eq!(config.token_storage_key, "token");
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let overrides: ConfigOverrides = serde_json::from_value(json!({
            "graphqlWsUrl": "wss://push.example.com/graphql",
            "toastDurationMs": 1500,
            "reconnect": { "maxAttempts": null, "baseDelayMs": 250 }
        }))
        .unwrap();

        let base = AppConfig::for_origin("https://todo.example.com");
        let config = base.clone().with_overrides(overrides);

        assert_eq!(config.graphql_http_url, base.graphql_http_url);
        assert_eq!(config.graphql_ws_url, "wss://push.example.com/graphql");
        assert_eq!(config.toast_duration_ms, 1500);
        assert_eq!(config.reconnect.base_delay_ms, 250);
        assert_eq!(config.reconnect.max_attempts, None);
        assert_eq!(config.reconnect.max_delay_ms, ReconnectPolicy::default().max_delay_ms);
    }
}
