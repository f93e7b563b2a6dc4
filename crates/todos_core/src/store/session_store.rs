//! Session-scoped in-memory todo store.
//!
//! # Responsibility
//! - Implement `TodoStore` over lists held in a caller-owned session payload.
//! - Seed the payload from the bundled fixture on first use.
//!
//! # Invariants
//! - Reads hand out clones; the session copy only changes through mutations.
//! - Title uniqueness and item cascade on list removal are enforced here,
//!   comparing the same `title_key` as the relational unique index.
//! - Generated ids are greater than every id already in the session.

use super::seed::{max_id, seed_todo_lists};
use super::{StoreError, StoreResult, TodoStore};
use crate::model::ordering::{sorted_items, sorted_lists_with_items};
use crate::model::todo::{title_key, ItemId, ListId, TodoItem, TodoList};
use serde::{Deserialize, Serialize};

/// Per-visitor session payload.
///
/// Serializable so any session transport can persist it between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub username: Option<String>,
    #[serde(default)]
    pub signed_in: bool,
    #[serde(default)]
    todo_lists: Option<Vec<TodoList>>,
    #[serde(default)]
    next_id: i64,
}

impl SessionData {
    /// Empty, signed-out session that will be seeded on first store use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session pre-populated with `lists` instead of the bundled fixture.
    pub fn with_lists(lists: Vec<TodoList>) -> Self {
        Self {
            next_id: max_id(&lists),
            todo_lists: Some(lists),
            ..Self::default()
        }
    }

    pub fn sign_in(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
        self.signed_in = true;
    }

    pub fn sign_out(&mut self) {
        self.username = None;
        self.signed_in = false;
    }

    /// Whether lists have been seeded or assigned yet.
    pub fn has_lists(&self) -> bool {
        self.todo_lists.is_some()
    }
}

/// In-memory `TodoStore` bound to one session payload.
pub struct SessionTodoStore<'s> {
    lists: &'s mut Vec<TodoList>,
    next_id: &'s mut i64,
}

impl<'s> SessionTodoStore<'s> {
    /// Binds to `session`, seeding it when it holds no lists yet.
    ///
    /// # Errors
    /// - Returns `StoreError::InvalidData` when the seed fixture cannot be parsed.
    pub fn new(session: &'s mut SessionData) -> StoreResult<Self> {
        let SessionData {
            todo_lists,
            next_id,
            ..
        } = session;

        if todo_lists.is_none() {
            *todo_lists = Some(seed_todo_lists()?);
        }
        let lists = todo_lists.get_or_insert_with(Vec::new);
        *next_id = (*next_id).max(max_id(lists));

        Ok(Self { lists, next_id })
    }

    fn generate_id(&mut self) -> i64 {
        *self.next_id += 1;
        *self.next_id
    }

    fn find_list(&self, list_id: ListId) -> Option<&TodoList> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    fn find_list_mut(&mut self, list_id: ListId) -> Option<&mut TodoList> {
        self.lists.iter_mut().find(|list| list.id == list_id)
    }

    fn title_taken(&self, title: &str, except: Option<ListId>) -> bool {
        let key = title_key(title);
        self.lists
            .iter()
            .any(|list| Some(list.id) != except && title_key(&list.title) == key)
    }
}

impl TodoStore for SessionTodoStore<'_> {
    fn list_all(&self) -> StoreResult<Vec<TodoList>> {
        Ok(sorted_lists_with_items(self.lists.clone()))
    }

    fn list_load(&self, list_id: ListId) -> StoreResult<Option<TodoList>> {
        Ok(self.find_list(list_id).cloned())
    }

    fn item_load(&self, list_id: ListId, item_id: ItemId) -> StoreResult<Option<TodoItem>> {
        Ok(self
            .find_list(list_id)
            .and_then(|list| list.find_item(item_id))
            .cloned())
    }

    fn items_sorted(&self, list: &TodoList) -> StoreResult<Vec<TodoItem>> {
        Ok(sorted_items(list.items.clone()))
    }

    fn item_toggle(&mut self, list_id: ListId, item_id: ItemId) -> StoreResult<bool> {
        match self
            .find_list_mut(list_id)
            .and_then(|list| list.find_item_mut(item_id))
        {
            Some(item) => {
                item.done = !item.done;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn items_mark_all_done(&mut self, list_id: ListId) -> StoreResult<bool> {
        let Some(list) = self.find_list_mut(list_id) else {
            return Ok(false);
        };
        list.items.iter_mut().for_each(|item| item.done = true);
        Ok(!list.items.is_empty())
    }

    fn item_delete(&mut self, list_id: ListId, item_id: ItemId) -> StoreResult<bool> {
        let Some(list) = self.find_list_mut(list_id) else {
            return Ok(false);
        };
        match list.items.iter().position(|item| item.id == item_id) {
            Some(index) => {
                list.items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn item_add(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        if self.find_list(list_id).is_none() {
            return Ok(false);
        }
        let item = TodoItem::new(self.generate_id(), title);
        if let Some(list) = self.find_list_mut(list_id) {
            list.items.push(item);
        }
        Ok(true)
    }

    fn list_add(&mut self, title: &str) -> StoreResult<bool> {
        if self.title_taken(title, None) {
            return Ok(false);
        }
        let list = TodoList::new(self.generate_id(), title);
        self.lists.push(list);
        Ok(true)
    }

    fn list_destroy(&mut self, list_id: ListId) -> StoreResult<bool> {
        match self.lists.iter().position(|list| list.id == list_id) {
            Some(index) => {
                self.lists.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list_set_title(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        if self.find_list(list_id).is_none() {
            return Ok(false);
        }
        if self.title_taken(title, Some(list_id)) {
            return Err(StoreError::UniqueViolation {
                title: title.to_string(),
            });
        }
        if let Some(list) = self.find_list_mut(list_id) {
            list.title = title.to_string();
        }
        Ok(true)
    }

    fn list_title_exists(&self, title: &str) -> StoreResult<bool> {
        Ok(self.lists.iter().any(|list| list.title == title))
    }

    fn verify_credentials(&self, _username: &str, _password: &str) -> StoreResult<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionData, SessionTodoStore};
    use crate::store::TodoStore;

    #[test]
    fn first_use_seeds_and_later_use_reuses_session_lists() {
        let mut session = SessionData::new();
        assert!(!session.has_lists());

        {
            let mut store = SessionTodoStore::new(&mut session).unwrap();
            assert_eq!(store.list_all().unwrap().len(), 4);
            assert!(store.list_add("Errands").unwrap());
        }
        assert!(session.has_lists());

        let store = SessionTodoStore::new(&mut session).unwrap();
        assert_eq!(store.list_all().unwrap().len(), 5);
    }

    #[test]
    fn generated_ids_follow_seeded_ids() {
        let mut session = SessionData::new();
        let mut store = SessionTodoStore::new(&mut session).unwrap();
        assert!(store.list_add("Errands").unwrap());

        let created = store
            .list_all()
            .unwrap()
            .into_iter()
            .find(|list| list.title == "Errands")
            .unwrap();
        assert_eq!(created.id, 9);
    }

    #[test]
    fn session_payload_survives_serialization() {
        let mut session = SessionData::new();
        session.sign_in("admin");
        {
            let mut store = SessionTodoStore::new(&mut session).unwrap();
            store.list_add("Errands").unwrap();
        }

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"todoLists\""));
        assert!(json.contains("\"signedIn\":true"));

        let mut restored: SessionData = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
        let mut store = SessionTodoStore::new(&mut restored).unwrap();
        assert!(store.list_add("Groceries").unwrap());
        let ids: Vec<i64> = store.list_all().unwrap().iter().map(|list| list.id).collect();
        assert!(ids.contains(&10));
    }

    #[test]
    fn sign_out_clears_identity_but_keeps_lists() {
        let mut session = SessionData::new();
        session.sign_in("admin");
        SessionTodoStore::new(&mut session).unwrap();

        session.sign_out();
        assert_eq!(session.username, None);
        assert!(!session.signed_in);
        assert!(session.has_lists());
    }
}
