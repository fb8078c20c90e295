//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::toast::Toast;

/// Page-wide state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Visible notifications, oldest first
    pub toasts: Vec<Toast>,
    /// Id for the next toast
    pub next_toast_id: u64,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

// ========================
// Store Helper Functions
// ========================

/// Push a toast and return its id
pub fn store_push_toast(store: &AppStore, build: impl FnOnce(u64) -> Toast) -> u64 {
    let id = {
        let field = store.next_toast_id();
        let mut next = field.write();
        let id = *next;
        *next += 1;
        id
    };
    store.toasts().write().push(build(id));
    id
}

/// Remove a toast by ID
pub fn store_dismiss_toast(store: &AppStore, toast_id: u64) {
    store.toasts().write().retain(|toast| toast.id != toast_id);
}

/// Snapshot of visible toasts (tracked)
pub fn store_toasts(store: &AppStore) -> Vec<Toast> {
    store.toasts().get()
}
