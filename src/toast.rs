//! Toast Notifications
//!
//! Transient messages of kind default or error. Toasts stack and dismiss
//! themselves after the configured duration.

use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::store::{store_dismiss_toast, store_push_toast, AppState, AppStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Default,
    Error,
}

impl ToastKind {
    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Default => "toast",
            ToastKind::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

/// Shows toasts; cheap to copy into callbacks
#[derive(Clone, Copy)]
pub struct Toaster {
    store: AppStore,
    duration_ms: u32,
}

impl Toaster {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            store: Store::new(AppState::default()),
            duration_ms,
        }
    }

    pub fn store(&self) -> AppStore {
        self.store
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let message = message.into();
        match kind {
            ToastKind::Error => log::warn!("[TOAST] {}", message),
            ToastKind::Default => log::debug!("[TOAST] {}", message),
        }
        let id = store_push_toast(&self.store, |id| Toast { id, message, kind });

        let store = self.store;
        let duration_ms = self.duration_ms;
        spawn_local(async move {
            TimeoutFuture::new(duration_ms).await;
            store_dismiss_toast(&store, id);
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Default);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }

    pub fn dismiss(&self, id: u64) {
        store_dismiss_toast(&self.store, id);
    }
}
