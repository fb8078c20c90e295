//! Frontend Models
//!
//! Data structures matching the GraphQL schema.

use serde::{Deserialize, Serialize};

/// Id prefix marking an item that only exists locally until the server confirms it
pub const PLACEHOLDER_ID_PREFIX: char = '-';

/// Signed-in user, decoded from the stored credential token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Raw token, sent as the bearer credential
    #[serde(skip)]
    pub jwt: String,
}

/// List owner as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub username: String,
}

/// To-do list. `items` is empty for the overview query, which does not select them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: String,
    pub name: String,
    pub shared: bool,
    pub owner: Owner,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Single to-do entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub description: String,
    pub position: i32,
    pub complete: bool,
}

impl Item {
    /// Local stand-in rendered while a creation is in flight
    pub fn placeholder(id: String, description: String) -> Self {
        Self {
            id,
            description,
            position: 0,
            complete: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.starts_with(PLACEHOLDER_ID_PREFIX)
    }
}
