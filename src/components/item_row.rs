//! Item Row Component
//!
//! One to-do entry; clicking it flips completion.

use leptos::prelude::*;

use crate::models::Item;

const OPEN_MARK: &str = "\u{2610}";
const DONE_MARK: &str = "\u{2611}";

#[component]
pub fn ItemRow(
    item: Item,
    #[prop(into)] on_toggle: Callback<Item>,
) -> impl IntoView {
    let (row_class, mark) = if item.complete {
        ("todo-item completed", DONE_MARK)
    } else {
        ("todo-item", OPEN_MARK)
    };
    // not clickable until the server confirms it
    let pending = item.is_placeholder();
    let description = item.description.clone();

    view! {
        <li
            class=row_class
            class:pending=move || pending
            on:click=move |_| {
                if !pending {
                    on_toggle.run(item.clone());
                }
            }
        >
            <span class="todo-mark">{mark}</span>
            {description}
        </li>
    }
}
