//! Display Ordering
//!
//! Items are partitioned and sorted at render time only; the cache keeps
//! merge order.

use crate::models::Item;

/// Open and completed items, each sorted by ascending position.
/// The sort is stable so equal positions keep cache order.
pub fn partition_items(items: &[Item]) -> (Vec<Item>, Vec<Item>) {
    let (mut open, mut done): (Vec<Item>, Vec<Item>) = items.iter().cloned().partition(|item| !item.complete);
    open.sort_by_key(|item| item.position);
    done.sort_by_key(|item| item.position);
    (open, done)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: &str, position: i32, complete: bool) -> Item {
        Item {
            id: id.to_string(),
            description: format!("Item {}", id),
            position,
            complete,
        }
    }

    #[test]
    fn test_partition_items() {
        let items = vec![
            make_item("1", 2, false),
            make_item("2", 1, false),
            make_item("3", 1, true),
        ];

        let (open, done) = partition_items(&items);

        let open_ids: Vec<_> = open.iter().map(|i| i.id.as_str()).collect();
        let done_ids: Vec<_> = done.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(open_ids, ["2", "1"]);
        assert_eq!(done_ids, ["3"]);
    }

    #[test]
    fn test_equal_positions_keep_cache_order() {
        let items = vec![make_item("b", 0, false), make_item("a", 0, false), make_item("c", -1, false)];
        let (open, _) = partition_items(&items);
        let ids: Vec<_> = open.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }
}
