//! Cache Reconciliation
//!
//! Pure merges of mutation results and subscription events into cached
//! query data. Every function takes the cached value (None when the query
//! has not been fetched yet) and returns the value to write back. An absent
//! cache entry is never fabricated from an event alone.

use crate::models::{Item, TodoList, PLACEHOLDER_ID_PREFIX};

/// Merge an item-changed event into a cached list.
///
/// A known item only takes the incoming `complete` flag; `description` and
/// `position` carried by the event are ignored. Unknown items are appended
/// unsorted.
pub fn apply_item_changed(cached: Option<TodoList>, incoming: &Item) -> Option<TodoList> {
    let mut list = cached?;
    match list.items.iter_mut().find(|item| item.id == incoming.id) {
        Some(item) => item.complete = incoming.complete,
        None => list.items.push(incoming.clone()),
    }
    Some(list)
}

/// Insert a created item unless an item with the same id is already cached
pub fn apply_item_created(cached: Option<TodoList>, created: &Item) -> Option<TodoList> {
    let mut list = cached?;
    if !list.items.iter().any(|item| item.id == created.id) {
        list.items.push(created.clone());
    }
    Some(list)
}

/// Drop every completed item
pub fn apply_completed_items_removed(cached: Option<TodoList>) -> Option<TodoList> {
    let mut list = cached?;
    list.items.retain(|item| !item.complete);
    Some(list)
}

/// Append a created list to the cached overview
pub fn apply_list_created(cached: Option<Vec<TodoList>>, created: &TodoList) -> Option<Vec<TodoList>> {
    let mut lists = cached?;
    lists.push(created.clone());
    Some(lists)
}

/// Remove one optimistic placeholder by id
pub fn discard_placeholder(cached: Option<TodoList>, placeholder_id: &str) -> Option<TodoList> {
    let mut list = cached?;
    list.items.retain(|item| item.id != placeholder_id);
    Some(list)
}

/// Resolve an in-flight creation: the placeholder always goes, the
/// confirmed item (if any) is inserted idempotently.
pub fn settle_placeholder(
    cached: Option<TodoList>,
    placeholder_id: &str,
    confirmed: Option<&Item>,
) -> Option<TodoList> {
    let list = discard_placeholder(cached, placeholder_id);
    match confirmed {
        Some(item) => apply_item_created(list, item),
        None => list,
    }
}

/// Hands out distinct placeholder ids (`-1`, `-2`, ...) so overlapping
/// creations settle independently.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderIds {
    issued: u32,
}

impl PlaceholderIds {
    pub fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("{}{}", PLACEHOLDER_ID_PREFIX, self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Owner;

    fn item(id: &str, position: i32, complete: bool) -> Item {
        Item {
            id: id.to_string(),
            description: format!("Item {}", id),
            position,
            complete,
        }
    }

    fn list(items: Vec<Item>) -> TodoList {
        TodoList {
            id: "42".to_string(),
            name: "Groceries".to_string(),
            shared: false,
            owner: Owner {
                id: "1".to_string(),
                username: "alice".to_string(),
            },
            items,
        }
    }

    #[test]
    fn test_item_changed_updates_complete_only() {
        let cached = list(vec![item("1", 1, false), item("2", 2, false)]);
        let incoming = Item {
            id: "2".to_string(),
            description: "renamed".to_string(),
            position: 9,
            complete: true,
        };

        let merged = apply_item_changed(Some(cached.clone()), &incoming).unwrap();

        assert_eq!(merged.items.len(), 2);
        assert_eq!(merged.items[0], cached.items[0]);
        assert!(merged.items[1].complete);
        assert_eq!(merged.items[1].description, "Item 2");
        assert_eq!(merged.items[1].position, 2);
    }

    #[test]
    fn test_item_changed_appends_unknown_item() {
        let cached = list(vec![item("1", 5, false)]);
        let incoming = item("7", 1, true);

        let merged = apply_item_changed(Some(cached), &incoming).unwrap();

        assert_eq!(merged.items.len(), 2);
        assert_eq!(merged.items[1], incoming);
    }

    #[test]
    fn test_item_changed_last_write_wins() {
        let cached = list(vec![item("1", 1, false)]);
        let merged = apply_item_changed(Some(cached), &item("1", 1, true));
        let merged = apply_item_changed(merged, &item("1", 1, false)).unwrap();
        assert_eq!(merged.items.len(), 1);
        assert!(!merged.items[0].complete);
    }

    #[test]
    fn test_absent_cache_is_noop() {
        assert_eq!(apply_item_changed(None, &item("1", 1, true)), None);
        assert_eq!(apply_item_created(None, &item("1", 1, true)), None);
        assert_eq!(apply_completed_items_removed(None), None);
        assert_eq!(apply_list_created(None, &list(vec![])), None);
        assert_eq!(settle_placeholder(None, "-1", Some(&item("1", 1, false))), None);
    }

    #[test]
    fn test_item_created_is_idempotent() {
        let cached = list(vec![item("1", 1, false)]);
        let created = item("2", 2, false);

        let once = apply_item_created(Some(cached), &created);
        let twice = apply_item_created(once.clone(), &created);

        assert_eq!(once, twice);
        assert_eq!(twice.unwrap().items.len(), 2);
    }

    #[test]
    fn test_item_created_after_subscription_event() {
        let cached = list(vec![item("1", 1, false)]);
        let pushed = apply_item_changed(Some(cached), &item("2", 2, false));
        let merged = apply_item_created(pushed, &item("2", 2, false)).unwrap();
        assert_eq!(merged.items.iter().filter(|i| i.id == "2").count(), 1);
    }

    #[test]
    fn test_completed_items_removed() {
        let cached = list(vec![item("1", 1, true), item("2", 2, false), item("3", 3, true)]);

        let once = apply_completed_items_removed(Some(cached));
        let twice = apply_completed_items_removed(once.clone());

        assert_eq!(once, twice);
        let items = twice.unwrap().items;
        assert_eq!(items.len(), 1);
        assert!(items.iter().all(|i| !i.complete));
    }

    #[test]
    fn test_list_created_appends() {
        let existing = vec![list(vec![])];
        let mut created = list(vec![]);
        created.id = "43".to_string();

        let lists = apply_list_created(Some(existing), &created).unwrap();

        assert_eq!(lists.len(), 2);
        assert_eq!(lists[1].id, "43");
    }

    #[test]
    fn test_failed_creation_leaves_no_ghost() {
        let mut ids = PlaceholderIds::default();
        let placeholder_id = ids.next_id();
        let cached = list(vec![item("1", 1, false)]);

        let pending = apply_item_created(Some(cached.clone()), &Item::placeholder(placeholder_id.clone(), "milk".into()));
        assert_eq!(pending.as_ref().unwrap().items.len(), 2);

        let settled = settle_placeholder(pending, &placeholder_id, None);
        assert_eq!(settled, Some(cached));
    }

    #[test]
    fn test_confirmed_creation_replaces_placeholder() {
        let mut ids = PlaceholderIds::default();
        let placeholder_id = ids.next_id();
        let cached = list(vec![]);
        let pending = apply_item_created(Some(cached), &Item::placeholder(placeholder_id.clone(), "milk".into()));

        let confirmed = item("9", 3, false);
        let settled = settle_placeholder(pending, &placeholder_id, Some(&confirmed)).unwrap();

        assert_eq!(settled.items, vec![confirmed]);
    }

    #[test]
    fn test_overlapping_placeholders_settle_independently() {
        let mut ids = PlaceholderIds::default();
        let first = ids.next_id();
        let second = ids.next_id();
        assert_eq!(first, "-1");
        assert_eq!(second, "-2");

        let pending = apply_item_created(Some(list(vec![])), &Item::placeholder(first.clone(), "a".into()));
        let pending = apply_item_created(pending, &Item::placeholder(second.clone(), "b".into()));

        let settled = settle_placeholder(pending, &first, None).unwrap();
        assert_eq!(settled.items.len(), 1);
        assert_eq!(settled.items[0].id, second);
        assert!(settled.items[0].is_placeholder());
    }
}
