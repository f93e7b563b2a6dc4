//! Todo list and item records.
//!
//! # Responsibility
//! - Define the owned data returned by store reads.
//! - Provide completion helpers shared by all backends.
//!
//! # Invariants
//! - `id` values never change after creation.
//! - A list is done only when it has at least one item and every item is done.

use serde::{Deserialize, Serialize};

/// Identifier of a todo list, unique within its owning user.
pub type ListId = i64;

/// Identifier of a todo item, unique within its owning list.
pub type ItemId = i64;

/// Inclusive upper bound for list and item titles, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Case-folded form of a title.
///
/// Used for list-title uniqueness and for title ordering, so "the same title
/// ignoring case" means one thing everywhere.
pub fn title_key(title: &str) -> String {
    title.to_lowercase()
}

/// A single completable entry of a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: ItemId,
    pub title: String,
    pub done: bool,
}

impl TodoItem {
    /// Creates a not-done item.
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }
}

/// A named, user-owned collection of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: ListId,
    pub title: String,
    /// Serialized as `todos` to match the session payload layout.
    #[serde(rename = "todos", default)]
    pub items: Vec<TodoItem>,
}

impl TodoList {
    /// Creates an empty list.
    pub fn new(id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            items: Vec::new(),
        }
    }

    /// Returns whether the list is non-empty and fully completed.
    pub fn is_done(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.done)
    }

    /// Number of completed items.
    pub fn count_done(&self) -> usize {
        self.items.iter().filter(|item| item.done).count()
    }

    /// Item with `item_id`, if this list holds it.
    pub fn find_item(&self, item_id: ItemId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Mutable access to the item with `item_id`.
    pub fn find_item_mut(&mut self, item_id: ItemId) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{title_key, TodoItem, TodoList};

    fn item(id: i64, done: bool) -> TodoItem {
        TodoItem {
            id,
            title: format!("item {id}"),
            done,
        }
    }

    #[test]
    fn empty_list_is_never_done() {
        assert!(!TodoList::new(1, "empty").is_done());
    }

    #[test]
    fn list_is_done_only_when_every_item_is_done() {
        let mut list = TodoList::new(1, "chores");
        list.items = vec![item(1, true), item(2, false)];
        assert!(!list.is_done());
        assert_eq!(list.count_done(), 1);

        list.find_item_mut(2).unwrap().done = true;
        assert!(list.is_done());
        assert_eq!(list.count_done(), 2);
    }

    #[test]
    fn serde_uses_todos_field_name() {
        let mut list = TodoList::new(7, "Home");
        list.items.push(TodoItem::new(8, "Buy milk"));

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["todos"][0]["title"], "Buy milk");
        assert_eq!(json["todos"][0]["done"], false);

        let back: TodoList = serde_json::from_value(json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn title_key_folds_non_ascii_letters() {
        assert_eq!(title_key("Été"), title_key("été"));
        assert_eq!(title_key("ÉTÉ"), "été");
        assert_ne!(title_key("Ete"), title_key("Été"));
    }
}
