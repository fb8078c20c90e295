//! List Detail View
//!
//! One list with its open and completed items. Data comes from the cache
//! (fetched cache-and-network) and is kept live by the item subscription.

use graphql_ws::SubscriptionEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::cache::{CacheKey, CacheValue};
use crate::components::notices::redirect_view;
use crate::components::ItemRow;
use crate::context::AppContext;
use crate::graphql::{self, failure_message, route_item_changed, subscribe_list_items, LIVE_UPDATES_FAILED};
use crate::models::Item;
use crate::ordering::partition_items;
use crate::reconcile::{apply_completed_items_removed, apply_item_changed, apply_item_created, settle_placeholder};

fn item_key(item: &Item) -> (String, bool, String, i32) {
    (item.id.clone(), item.complete, item.description.clone(), item.position)
}

#[component]
pub fn ListView(ctx: AppContext, list_id: String) -> impl IntoView {
    if let Some(redirect) = ctx.login_redirect() {
        return redirect_view(ctx, redirect);
    }

    let list_id = StoredValue::new(list_id);
    let (query_error, set_query_error) = signal(None::<String>);
    let (subscription_error, set_subscription_error) = signal(None::<String>);
    let (new_todo_text, set_new_todo_text) = signal(String::new());
    let input_ref = NodeRef::<leptos::html::Input>::new();

    // Fetch and overwrite the cached list
    let refetch = move || {
        let id = list_id.get_value();
        spawn_local(async move {
            match graphql::fetch_list(&ctx.client(), &id).await {
                Ok(list) => {
                    log::debug!("[LIST] loaded {} with {} items", id, list.items.len());
                    set_query_error.set(None);
                    ctx.cache.set(CacheKey::List(id), CacheValue::List(list));
                }
                Err(err) => {
                    set_query_error.set(Some(err.to_string()));
                    ctx.report(&err, "Request failed");
                }
            }
        });
    };
    refetch();

    let subscription = {
        let id = list_id.get_value();
        let token = ctx.user().map(|user| user.jwt);
        subscribe_list_items(&ctx.config(), token.as_deref(), &list_id.get_value(), move |event| {
            if let Some(message) = failure_message(&event) {
                log::warn!("[SUB] list {}: {}", id, message);
                set_subscription_error.set(Some(message));
                ctx.toaster.error(LIVE_UPDATES_FAILED);
            }
            match event {
                SubscriptionEvent::Data(data) => {
                    ctx.cache.update(|cache| route_item_changed(cache, &id, &data));
                }
                SubscriptionEvent::Connected { reconnected } => {
                    set_subscription_error.set(None);
                    if reconnected {
                        // events may have been missed while disconnected
                        refetch();
                    }
                }
                SubscriptionEvent::Reconnecting { attempt, delay_ms } => {
                    log::info!("[SUB] list {} reconnecting (attempt {}, {}ms)", id, attempt, delay_ms);
                }
                SubscriptionEvent::Completed => log::info!("[SUB] list {} subscription completed", id),
                SubscriptionEvent::Errors(_) | SubscriptionEvent::Failed(_) => {}
            }
        })
    };
    on_cleanup(move || subscription.cancel());

    let list = Memo::new(move |_| list_id.with_value(|id| ctx.cache.list(id)));
    let sections = Memo::new(move |_| {
        list.with(|list| list.as_ref().map(|l| partition_items(&l.items)).unwrap_or_default())
    });
    let has_completed = move || sections.with(|(_, done)| !done.is_empty());

    let add_todo = move || {
        let text = new_todo_text.get_untracked();
        if text.is_empty() {
            return;
        }
        let id = list_id.get_value();
        let placeholder_id = ctx.next_placeholder_id();
        let placeholder = Item::placeholder(placeholder_id.clone(), text.clone());
        ctx.cache.update_list(&id, |cached| apply_item_created(cached, &placeholder));

        set_new_todo_text.set(String::new());
        if let Some(input) = input_ref.get_untracked() {
            let _ = input.focus();
        }

        spawn_local(async move {
            let result = graphql::create_list_item(&ctx.client(), &id, &text).await;
            ctx.cache
                .update_list(&id, |cached| settle_placeholder(cached, &placeholder_id, result.as_ref().ok()));
            if let Err(err) = result {
                ctx.report(&err, "Create todo failed");
            }
        });
    };

    let toggle_item = Callback::new(move |item: Item| {
        let id = list_id.get_value();
        spawn_local(async move {
            match graphql::complete_list_item(&ctx.client(), &item.id, !item.complete).await {
                Ok(updated) => {
                    ctx.cache.update_list(&id, |cached| apply_item_changed(cached, &updated));
                    ctx.toaster.info("Marked todo");
                }
                Err(err) => ctx.report(&err, "Marking todo failed"),
            }
        });
    });

    let clear_completed = move |_| {
        let id = list_id.get_value();
        spawn_local(async move {
            match graphql::remove_completed_list_items(&ctx.client(), &id).await {
                Ok(true) => ctx.cache.update_list(&id, apply_completed_items_removed),
                Ok(false) => log::info!("[LIST] server removed nothing from {}", id),
                Err(err) => ctx.report(&err, "Remove completed todos failed"),
            }
        });
    };

    let ready = move || query_error.with(Option::is_none) && subscription_error.with(Option::is_none);

    view! {
        <div class="list-page">
            {move || query_error.get().map(|err| view! { <div class="error-block">{err}</div> })}
            {move || subscription_error.get().map(|err| view! { <div class="error-block">{err}</div> })}

            <Show when=move || ready() && list.with(Option::is_some) fallback=move || {
                ready().then(|| view! { <div class="loading">"Loading..."</div> })
            }>
                <h2 class="section-title">
                    "Todo: " {move || list.with(|l| l.as_ref().map(|l| l.name.clone()).unwrap_or_default())}
                </h2>
                <ul class="todo-items">
                    <For
                        each=move || sections.get().0
                        key=item_key
                        children=move |item| view! { <ItemRow item=item on_toggle=toggle_item /> }
                    />
                </ul>
                <Show when=move || sections.with(|(open, _)| open.is_empty())>
                    <div class="list-empty">"List empty"</div>
                </Show>

                <h2 class="section-title">"Completed Todos"</h2>
                <ul class="todo-items">
                    <For
                        each=move || sections.get().1
                        key=item_key
                        children=move |item| view! { <ItemRow item=item on_toggle=toggle_item /> }
                    />
                </ul>
                <Show when=move || !has_completed()>
                    <div class="list-empty">"List empty"</div>
                </Show>

                <div class="add-todo">
                    <input
                        type="text"
                        node_ref=input_ref
                        prop:value=move || new_todo_text.get()
                        on:input=move |ev| set_new_todo_text.set(event_target_value(&ev))
                        on:keypress=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                add_todo();
                            }
                        }
                    />
                    <button class="add-btn" on:click=move |_| add_todo()>"ADD"</button>
                    <div class="clear-row">
                        <button class="clear-btn" disabled=move || !has_completed() on:click=clear_completed>
                            "CLEAR"
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
    .into_any()
}
