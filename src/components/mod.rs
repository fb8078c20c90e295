//! UI Components
//!
//! Views and reusable Leptos components.

mod item_row;
mod list_view;
mod lists_view;
mod notices;
mod toast_host;

pub use item_row::ItemRow;
pub use list_view::ListView;
pub use lists_view::ListsView;
pub use notices::{ExternalPage, LoginNotice, NotFound};
pub use toast_host::ToastHost;
