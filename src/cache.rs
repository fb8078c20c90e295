//! Query Cache
//!
//! Client-side copies of query results keyed by query identity. The plain
//! `GraphCache` holds the data; `CacheHandle` wraps it in a signal so views
//! re-render on writes.

use std::collections::HashMap;

use leptos::prelude::*;

use crate::models::TodoList;

/// Query identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// `List(id)`
    List(String),
    /// `Lists()`
    Lists,
}

/// Cached query result
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    List(TodoList),
    Lists(Vec<TodoList>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphCache {
    entries: HashMap<CacheKey, CacheValue>,
}

impl GraphCache {
    pub fn get(&self, key: &CacheKey) -> Option<&CacheValue> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: CacheKey, value: CacheValue) {
        self.entries.insert(key, value);
    }

    pub fn list(&self, id: &str) -> Option<&TodoList> {
        match self.get(&CacheKey::List(id.to_string())) {
            Some(CacheValue::List(list)) => Some(list),
            _ => None,
        }
    }

    pub fn lists(&self) -> Option<&Vec<TodoList>> {
        match self.get(&CacheKey::Lists) {
            Some(CacheValue::Lists(lists)) => Some(lists),
            _ => None,
        }
    }

    /// Read-modify-write of one list entry. A `None` result leaves the cache untouched.
    pub fn update_list<F>(&mut self, id: &str, reconcile: F) -> bool
    where
        F: FnOnce(Option<TodoList>) -> Option<TodoList>,
    {
        let current = self.list(id).cloned();
        match reconcile(current) {
            Some(list) => {
                self.set(CacheKey::List(id.to_string()), CacheValue::List(list));
                true
            }
            None => false,
        }
    }

    /// Read-modify-write of the overview entry
    pub fn update_lists<F>(&mut self, reconcile: F) -> bool
    where
        F: FnOnce(Option<Vec<TodoList>>) -> Option<Vec<TodoList>>,
    {
        let current = self.lists().cloned();
        match reconcile(current) {
            Some(lists) => {
                self.set(CacheKey::Lists, CacheValue::Lists(lists));
                true
            }
            None => false,
        }
    }
}

/// Reactive handle to the page's single cache
#[derive(Clone, Copy)]
pub struct CacheHandle {
    inner: RwSignal<GraphCache>,
}

impl CacheHandle {
    pub fn new() -> Self {
        Self {
            inner: RwSignal::new(GraphCache::default()),
        }
    }

    /// Tracked read of one list
    pub fn list(&self, id: &str) -> Option<TodoList> {
        self.inner.with(|cache| cache.list(id).cloned())
    }

    /// Tracked read of the overview
    pub fn lists(&self) -> Option<Vec<TodoList>> {
        self.inner.with(|cache| cache.lists().cloned())
    }

    pub fn set(&self, key: CacheKey, value: CacheValue) {
        self.inner.update(|cache| cache.set(key, value));
    }

    /// Run `f` against the cache as one write; None once the page is torn down
    pub fn update<R>(&self, f: impl FnOnce(&mut GraphCache) -> R) -> Option<R> {
        self.inner.try_update(f)
    }

    pub fn update_list<F>(&self, id: &str, reconcile: F)
    where
        F: FnOnce(Option<TodoList>) -> Option<TodoList>,
    {
        if !self.update(|cache| cache.update_list(id, reconcile)).unwrap_or(false) {
            log::debug!("[CACHE] list {} not cached, event dropped", id);
        }
    }

    pub fn update_lists<F>(&self, reconcile: F)
    where
        F: FnOnce(Option<Vec<TodoList>>) -> Option<Vec<TodoList>>,
    {
        if !self.update(|cache| cache.update_lists(reconcile)).unwrap_or(false) {
            log::debug!("[CACHE] overview not cached, event dropped");
        }
    }
}
