//! Application Context
//!
//! Everything a view needs, bundled into one `Copy` value that is handed to
//! each view as a prop.

use leptos::prelude::*;

use crate::cache::CacheHandle;
use crate::config::AppConfig;
use crate::graphql::GraphqlClient;
use crate::models::User;
use crate::reconcile::PlaceholderIds;
use crate::error::ApiError;
use crate::routes::{guard, Redirect, Route, Router};
use crate::session::Session;
use crate::toast::{ToastKind, Toaster};

/// What the user sees for a failed request
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: ToastKind,
    pub message: String,
    /// Set when the failure means the credential was rejected
    pub redirect: Option<Redirect>,
}

/// Every failure is an error toast; a rejected credential also leaves
/// `current_path` for the login page.
pub fn notice_for(err: &ApiError, message: &str, current_path: &str) -> Notice {
    let redirect = match err {
        ApiError::Unauthenticated => Some(Redirect::to_login(current_path)),
        _ => None,
    };
    Notice {
        kind: ToastKind::Error,
        message: message.to_string(),
        redirect,
    }
}

#[derive(Clone, Copy)]
pub struct AppContext {
    /// Resolved once at startup, never changes afterwards
    session: StoredValue<Session>,
    config: StoredValue<AppConfig>,
    pub toaster: Toaster,
    pub cache: CacheHandle,
    pub router: Router,
    placeholder_ids: StoredValue<PlaceholderIds>,
}

impl AppContext {
    pub fn new(config: AppConfig, session: Session, router: Router) -> Self {
        Self {
            toaster: Toaster::new(config.toast_duration_ms),
            session: StoredValue::new(session),
            config: StoredValue::new(config),
            cache: CacheHandle::new(),
            router,
            placeholder_ids: StoredValue::new(PlaceholderIds::default()),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.session.with_value(|session| session.user().cloned())
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    /// HTTP client carrying the session's bearer token
    pub fn client(&self) -> GraphqlClient {
        let token = self.session.with_value(|session| session.token().map(String::from));
        self.config.with_value(|config| GraphqlClient::new(config.graphql_http_url.clone(), token))
    }

    pub fn next_placeholder_id(&self) -> String {
        self.placeholder_ids
            .try_update_value(|ids| ids.next_id())
            .unwrap_or_else(|| PlaceholderIds::default().next_id())
    }

    /// Login redirect for the current route, if the session requires one
    pub fn login_redirect(&self) -> Option<Redirect> {
        let path = self.router.path();
        let route = Route::parse(&path);
        self.session.with_value(|session| guard(&route, &path, session))
    }

    /// Surface a failed request as an error toast. A rejected credential
    /// also sends the user to the login page.
    pub fn report(&self, err: &ApiError, message: &str) {
        log::warn!("[APP] {}: {}", message, err);
        let notice = notice_for(err, message, &self.router.path());
        self.toaster.show(notice.message, notice.kind);
        if let Some(redirect) = notice.redirect {
            self.router.redirect(&redirect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_creation_is_an_error_toast() {
        let notice = notice_for(
            &ApiError::Graphql(vec!["list is closed".to_string()]),
            "Create todo failed",
            "/lists/42",
        );
        assert_eq!(
            notice,
            Notice {
                kind: ToastKind::Error,
                message: "Create todo failed".to_string(),
                redirect: None,
            }
        );
    }

    #[test]
    fn test_network_failure_stays_on_page() {
        let notice = notice_for(&ApiError::Network("offline".to_string()), "Request failed", "/lists");
        assert_eq!(notice.kind, ToastKind::Error);
        assert_eq!(notice.message, "Request failed");
        assert!(notice.redirect.is_none());
    }

    #[test]
    fn test_rejected_credential_redirects_to_login() {
        let notice = notice_for(&ApiError::Unauthenticated, "Marking todo failed", "/lists/42");
        assert_eq!(notice.kind, ToastKind::Error);
        assert_eq!(notice.message, "Marking todo failed");

        let redirect = notice.redirect.unwrap();
        assert_eq!(redirect, Redirect::to_login("/lists/42"));
        assert_eq!(redirect.href(), "/login?referrer=%2Flists%2F42");
    }
}
