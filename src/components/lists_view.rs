//! List Overview
//!
//! The signed-in user's lists plus a form to create a new one.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::cache::{CacheKey, CacheValue};
use crate::components::notices::redirect_view;
use crate::context::AppContext;
use crate::graphql;
use crate::models::TodoList;
use crate::reconcile::apply_list_created;
use crate::routes::{list_path, SHARE_PATH};

#[component]
pub fn ListsView(ctx: AppContext) -> impl IntoView {
    if let Some(redirect) = ctx.login_redirect() {
        return redirect_view(ctx, redirect);
    }

    let (new_list_name, set_new_list_name) = signal(String::new());
    let (query_error, set_query_error) = signal(None::<String>);

    spawn_local(async move {
        match graphql::fetch_lists(&ctx.client()).await {
            Ok(lists) => {
                log::debug!("[LISTS] loaded {} lists", lists.len());
                ctx.cache.set(CacheKey::Lists, CacheValue::Lists(lists));
            }
            Err(err) => {
                set_query_error.set(Some(err.to_string()));
                ctx.report(&err, "Request failed");
            }
        }
    });

    let add_list = move || {
        let name = new_list_name.get_untracked();
        if name.is_empty() {
            return;
        }
        spawn_local(async move {
            match graphql::create_list(&ctx.client(), &name).await {
                Ok(list) => {
                    ctx.cache.update_lists(|cached| apply_list_created(cached, &list));
                    ctx.toaster.info("Created List");
                }
                Err(err) => ctx.report(&err, "Create list failed"),
            }
        });
    };

    let go = move |path: String| {
        move |ev: web_sys::MouseEvent| {
            ev.prevent_default();
            ctx.router.navigate(&path);
        }
    };

    view! {
        {move || match query_error.get() {
            Some(_) => view! { <p class="error-block">"Error :("</p> }.into_any(),
            None => view! {
                <div class="lists-page">
                    <h1 class="page-title">"Lists"</h1>
                    <ul class="lists">
                        <For
                            each=move || ctx.cache.lists().unwrap_or_default()
                            key=|list: &TodoList| (list.id.clone(), list.name.clone(), list.shared)
                            children=move |list| {
                                let href = list_path(&list.id);
                                let owner = list.shared.then(|| list.owner.username.clone());
                                view! {
                                    <li class="list-row">
                                        <a href=href.clone() on:click=go(href)>
                                            <span>{list.name}</span>
                                            <span class="list-owner">{owner}</span>
                                        </a>
                                    </li>
                                }
                            }
                        />
                    </ul>

                    <div class="add-list">
                        <input
                            type="text"
                            prop:value=move || new_list_name.get()
                            on:input=move |ev| set_new_list_name.set(event_target_value(&ev))
                            on:keypress=move |ev: web_sys::KeyboardEvent| {
                                if ev.key() == "Enter" {
                                    add_list();
                                }
                            }
                        />
                        <button
                            class="add-btn"
                            disabled=move || new_list_name.with(String::is_empty)
                            on:click=move |_| add_list()
                        >
                            "Add new List"
                        </button>
                    </div>
                    <a href=SHARE_PATH on:click=go(SHARE_PATH.to_string())>"Share Lists"</a>
                </div>
            }
            .into_any(),
        }}
    }
    .into_any()
}
