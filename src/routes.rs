//! Client-side Routing
//!
//! Path parsing, the login redirect rule and a History API backed router.

use leptos::prelude::*;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const SHARE_PATH: &str = "/lists/share";

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Lists,
    List(String),
    /// Sharing page, served outside this client
    Share,
    Login { referrer: Option<String> },
    NotFound,
}

impl Route {
    /// Parse `path` with optional `?query`
    pub fn parse(location: &str) -> Self {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["lists"] => Route::Lists,
            ["login"] => Route::Login {
                referrer: query_param(query, "referrer"),
            },
            ["lists", "share"] => Route::Share,
            ["lists", id] => Route::List(id.to_string()),
            _ => Route::NotFound,
        }
    }

    /// Views that need a signed-in user
    pub fn requires_user(&self) -> bool {
        matches!(self, Route::Lists | Route::List(_) | Route::Share)
    }
}

pub fn list_path(id: &str) -> String {
    format!("/lists/{}", id)
}

/// Where to go instead of the requested view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redirect {
    pub pathname: String,
    pub referrer: String,
}

impl Redirect {
    pub fn to_login(referrer: &str) -> Self {
        Self {
            pathname: LOGIN_PATH.to_string(),
            referrer: referrer.to_string(),
        }
    }

    /// Location including the referrer query parameter
    pub fn href(&self) -> String {
        format!(
            "{}?referrer={}",
            self.pathname,
            utf8_percent_encode(&self.referrer, NON_ALPHANUMERIC)
        )
    }
}

/// Unauthenticated access to a protected view goes to the login page
pub fn guard(route: &Route, path: &str, session: &Session) -> Option<Redirect> {
    if route.requires_user() && session.user().is_none() {
        Some(Redirect::to_login(path))
    } else {
        None
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
}

/// History state pushed with every navigation
#[derive(Serialize, Deserialize)]
struct HistoryState {
    referrer: Option<String>,
}

/// Current location as a signal, kept in sync with the browser history
#[derive(Clone, Copy)]
pub struct Router {
    location: RwSignal<String>,
}

impl Router {
    pub fn new() -> Self {
        let router = Self {
            location: RwSignal::new(current_location()),
        };
        router.listen_popstate();
        router
    }

    pub fn route(&self) -> Route {
        Route::parse(&self.location.get())
    }

    /// Path without the query string (untracked)
    pub fn path(&self) -> String {
        self.location.with_untracked(|loc| loc.split('?').next().unwrap_or_default().to_string())
    }

    pub fn navigate(&self, to: &str) {
        let referrer = Some(self.path());
        if let Err(e) = push_history(to, &HistoryState { referrer }, false) {
            log::warn!("[ROUTER] pushState failed: {:?}", e);
        }
        self.location.set(to.to_string());
    }

    /// Replace the current entry, e.g. when bouncing to login
    pub fn redirect(&self, redirect: &Redirect) {
        let to = redirect.href();
        log::info!("[ROUTER] redirecting to {}", to);
        let state = HistoryState {
            referrer: Some(redirect.referrer.clone()),
        };
        if let Err(e) = push_history(&to, &state, true) {
            log::warn!("[ROUTER] replaceState failed: {:?}", e);
        }
        self.location.set(to);
    }

    fn listen_popstate(&self) {
        let Some(window) = web_sys::window() else { return };
        let location = self.location;
        let cb = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(move |_: web_sys::PopStateEvent| {
            location.set(current_location());
        });
        if window
            .add_event_listener_with_callback("popstate", cb.as_ref().unchecked_ref())
            .is_ok()
        {
            // Router lives for the whole page
            cb.forget();
        }
    }
}

fn current_location() -> String {
    web_sys::window()
        .and_then(|w| {
            let loc = w.location();
            Some(format!("{}{}", loc.pathname().ok()?, loc.search().unwrap_or_default()))
        })
        .unwrap_or_else(|| "/".to_string())
}

fn push_history(url: &str, state: &HistoryState, replace: bool) -> Result<(), JsValue> {
    let history = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .history()?;
    let state = serde_wasm_bindgen::to_value(state)?;
    if replace {
        history.replace_state_with_url(&state, "", Some(url))
    } else {
        history.push_state_with_url(&state, "", Some(url))
    }
}
