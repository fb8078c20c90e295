//! Notice Pages
//!
//! Placeholders for routes served outside this client, plus the redirect
//! shown while bouncing an anonymous visitor to login.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::routes::{Redirect, LOGIN_PATH};

/// Navigate to login once mounted
pub fn redirect_view(ctx: AppContext, redirect: Redirect) -> AnyView {
    let router = ctx.router;
    Effect::new(move |_| router.redirect(&redirect));
    view! { <p class="notice">"Redirecting to login..."</p> }.into_any()
}

#[component]
pub fn LoginNotice(referrer: Option<String>) -> impl IntoView {
    view! {
        <div class="notice">
            <h1 class="page-title">"Sign in"</h1>
            <p>"Signing in happens on the account page at " <code>{LOGIN_PATH}</code> "."</p>
            {referrer.map(|path| view! {
                <p class="notice-referrer">"You will return to " <code>{path}</code> " afterwards."</p>
            })}
        </div>
    }
}

#[component]
pub fn ExternalPage(#[prop(into)] title: String) -> impl IntoView {
    view! {
        <div class="notice">
            <h1 class="page-title">{title}</h1>
            <p>"This page is not part of the lists client."</p>
        </div>
    }
}

#[component]
pub fn NotFound(ctx: AppContext) -> impl IntoView {
    view! {
        <div class="notice">
            <h1 class="page-title">"Not found"</h1>
            <a href="/lists" on:click=move |ev: web_sys::MouseEvent| {
                ev.prevent_default();
                ctx.router.navigate("/lists");
            }>"Back to lists"</a>
        </div>
    }
}
