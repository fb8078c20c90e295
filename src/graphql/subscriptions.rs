//! List Item Subscription
//!
//! Opens `OnListItemChanged` for one list and routes every pushed item
//! into that list's cache entry.

use graphql_ws::{ConnectOptions, SubscribePayload, SubscriptionEvent, SubscriptionHandle};
use serde_json::json;

use super::{ListIdVariables, ListItemChangedData, OnListItemChangedSubscription, Operation};
use crate::cache::GraphCache;
use crate::config::AppConfig;
use crate::reconcile::apply_item_changed;

/// Apply one pushed change to the cached list; false when nothing was cached
pub fn route_item_changed(cache: &mut GraphCache, list_id: &str, data: &ListItemChangedData) -> bool {
    match &data.list_item_changed {
        Some(item) => cache.update_list(list_id, |cached| apply_item_changed(cached, item)),
        None => false,
    }
}

/// Toast shown whenever the live channel reports a problem
pub const LIVE_UPDATES_FAILED: &str = "Live updates failed";

/// Inline message for events the user has to hear about: field errors in a
/// pushed payload and terminal channel failures
pub fn failure_message<T>(event: &SubscriptionEvent<T>) -> Option<String> {
    match event {
        SubscriptionEvent::Errors(errors) => Some(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        ),
        SubscriptionEvent::Failed(err) => Some(err.to_string()),
        _ => None,
    }
}

/// Subscribe to item changes of `list_id`
pub fn subscribe_list_items<F>(config: &AppConfig, token: Option<&str>, list_id: &str, on_event: F) -> SubscriptionHandle
where
    F: Fn(SubscriptionEvent<ListItemChangedData>) + 'static,
{
    let variables = ListIdVariables {
        list_id: list_id.to_string(),
    };
    let payload = SubscribePayload {
        query: OnListItemChangedSubscription::DOCUMENT.to_string(),
        variables: serde_json::to_value(&variables).unwrap_or_default(),
        operation_name: Some(OnListItemChangedSubscription::NAME.to_string()),
    };
    let options = ConnectOptions {
        url: config.graphql_ws_url.clone(),
        connection_params: token.map(|t| json!({ "authorization": format!("Bearer {}", t) })),
        policy: config.reconnect,
    };
    log::info!("[SUB] subscribing to list {}", list_id);
    graphql_ws::subscribe(options, payload, on_event)
}
