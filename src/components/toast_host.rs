//! Toast Host Component
//!
//! Renders the notification stack; click a toast to dismiss it early.

use leptos::prelude::*;

use crate::store::store_toasts;
use crate::toast::Toaster;

#[component]
pub fn ToastHost(toaster: Toaster) -> impl IntoView {
    let store = toaster.store();

    view! {
        <div class="toast-stack">
            <For
                each=move || store_toasts(&store)
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() on:click=move |_| toaster.dismiss(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
