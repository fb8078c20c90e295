//! Shared Todo App
//!
//! Root component: builds the `AppContext` and switches views by route.

use leptos::prelude::*;

use crate::components::{ExternalPage, ListView, ListsView, LoginNotice, NotFound, ToastHost};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::routes::{Route, Router};
use crate::session::Session;

#[component]
fn Header(ctx: AppContext) -> impl IntoView {
    let username = ctx.user().map(|user| user.username);

    view! {
        <header class="app-header">
            <a class="app-title" href="/lists" on:click=move |ev: web_sys::MouseEvent| {
                ev.prevent_default();
                ctx.router.navigate("/lists");
            }>"Todo"</a>
            <span class="app-user">{username}</span>
        </header>
    }
}

#[component]
pub fn App(config: AppConfig, session: Session) -> impl IntoView {
    let ctx = AppContext::new(config, session, Router::new());

    view! {
        <div class="app-layout">
            <Header ctx=ctx />
            <main class="page-content">
                {move || match ctx.router.route() {
                    Route::Lists => view! { <ListsView ctx=ctx /> }.into_any(),
                    Route::List(id) => view! { <ListView ctx=ctx list_id=id /> }.into_any(),
                    Route::Share => view! { <ExternalPage title="Share Lists" /> }.into_any(),
                    Route::Login { referrer } => view! { <LoginNotice referrer=referrer /> }.into_any(),
                    Route::NotFound => view! { <NotFound ctx=ctx /> }.into_any(),
                }}
            </main>
            <ToastHost toaster=ctx.toaster />
        </div>
    }
}
