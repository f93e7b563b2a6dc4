//! SQLite-backed todo store scoped to one authenticated user.
//!
//! # Responsibility
//! - Implement `TodoStore` with one pooled connection per statement.
//! - Fetch independent result sets concurrently and join them by list id.
//!
//! # Invariants
//! - Every statement filters by the bound username as well as entity ids.
//! - Item cascade on list deletion is left to the `ON DELETE CASCADE` rule.
//! - `title_key` is always written from `model::todo::title_key`.
//! - Row order from SQL is by id only; presentation order comes from
//!   `model::ordering`.

use super::{StoreError, StoreResult, TodoStore};
use crate::auth::password::{verify_password, DUMMY_PASSWORD_HASH};
use crate::db::query::{execute, query_optional, query_rows};
use crate::db::ConnectionPool;
use crate::model::ordering::{sorted_items, sorted_lists_with_items};
use crate::model::todo::{title_key, ItemId, ListId, TodoItem, TodoList};
use rusqlite::{params, Row};
use std::collections::HashMap;
use std::{panic, thread};

const ALL_LISTS_SQL: &str = "SELECT id, title
FROM todolists
WHERE username = ?1
ORDER BY id;";

const ALL_ITEMS_SQL: &str = "SELECT id, title, done, todolist_id
FROM todos
WHERE username = ?1
ORDER BY id;";

const LIST_SQL: &str = "SELECT id, title
FROM todolists
WHERE id = ?1
  AND username = ?2;";

const LIST_ITEMS_SQL: &str = "SELECT id, title, done, todolist_id
FROM todos
WHERE todolist_id = ?1
  AND username = ?2
ORDER BY id;";

const ITEM_SQL: &str = "SELECT id, title, done, todolist_id
FROM todos
WHERE id = ?1
  AND todolist_id = ?2
  AND username = ?3;";

const TOGGLE_ITEM_SQL: &str = "UPDATE todos
SET done = NOT done
WHERE id = ?1
  AND todolist_id = ?2
  AND username = ?3;";

const MARK_ALL_DONE_SQL: &str = "UPDATE todos
SET done = 1
WHERE todolist_id = ?1
  AND username = ?2;";

const DELETE_ITEM_SQL: &str = "DELETE FROM todos
WHERE id = ?1
  AND todolist_id = ?2
  AND username = ?3;";

// Selecting through the owning list keeps items off other users' lists.
const ADD_ITEM_SQL: &str = "INSERT INTO todos (title, todolist_id, username)
SELECT ?1, id, username
FROM todolists
WHERE id = ?2
  AND username = ?3;";

const ADD_LIST_SQL: &str = "INSERT INTO todolists (title, title_key, username)
VALUES (?1, ?2, ?3);";

const DESTROY_LIST_SQL: &str = "DELETE FROM todolists
WHERE id = ?1
  AND username = ?2;";

const SET_TITLE_SQL: &str = "UPDATE todolists
SET title = ?1,
    title_key = ?2
WHERE id = ?3
  AND username = ?4;";

const TITLE_EXISTS_SQL: &str = "SELECT 1
FROM todolists
WHERE title = ?1
  AND username = ?2
LIMIT 1;";

const USER_PASSWORD_SQL: &str = "SELECT password FROM users WHERE username = ?1;";

/// Relational `TodoStore` bound to one username.
///
/// Cheap to construct; build one per request from a shared pool.
#[derive(Clone)]
pub struct SqliteTodoStore {
    pool: ConnectionPool,
    username: String,
}

impl SqliteTodoStore {
    pub fn new(pool: ConnectionPool, username: impl Into<String>) -> Self {
        Self {
            pool,
            username: username.into(),
        }
    }

    /// The user every query is scoped to.
    pub fn username(&self) -> &str {
        &self.username
    }

    fn fetch_lists(&self) -> StoreResult<Vec<TodoList>> {
        Ok(query_rows(
            &self.pool,
            "all_lists",
            ALL_LISTS_SQL,
            [self.username.as_str()],
            parse_list_row,
        )?)
    }

    fn fetch_items(&self) -> StoreResult<Vec<(ListId, TodoItem)>> {
        Ok(query_rows(
            &self.pool,
            "all_items",
            ALL_ITEMS_SQL,
            [self.username.as_str()],
            parse_item_row,
        )?)
    }

    fn fetch_list(&self, list_id: ListId) -> StoreResult<Option<TodoList>> {
        Ok(query_optional(
            &self.pool,
            "list",
            LIST_SQL,
            params![list_id, self.username],
            parse_list_row,
        )?)
    }

    fn fetch_list_items(&self, list_id: ListId) -> StoreResult<Vec<TodoItem>> {
        let rows = query_rows(
            &self.pool,
            "list_items",
            LIST_ITEMS_SQL,
            params![list_id, self.username],
            parse_item_row,
        )?;
        Ok(rows.into_iter().map(|(_, item)| item).collect())
    }
}

impl TodoStore for SqliteTodoStore {
    fn list_all(&self) -> StoreResult<Vec<TodoList>> {
        let (lists, items) = fetch_both(|| self.fetch_lists(), || self.fetch_items())?;
        Ok(sorted_lists_with_items(attach_items(lists, items)))
    }

    fn list_load(&self, list_id: ListId) -> StoreResult<Option<TodoList>> {
        let (list, items) = fetch_both(
            || self.fetch_list(list_id),
            || self.fetch_list_items(list_id),
        )?;
        Ok(list.map(|mut list| {
            list.items = items;
            list
        }))
    }

    fn item_load(&self, list_id: ListId, item_id: ItemId) -> StoreResult<Option<TodoItem>> {
        let row = query_optional(
            &self.pool,
            "item",
            ITEM_SQL,
            params![item_id, list_id, self.username],
            parse_item_row,
        )?;
        Ok(row.map(|(_, item)| item))
    }

    fn items_sorted(&self, list: &TodoList) -> StoreResult<Vec<TodoItem>> {
        Ok(sorted_items(self.fetch_list_items(list.id)?))
    }

    fn item_toggle(&mut self, list_id: ListId, item_id: ItemId) -> StoreResult<bool> {
        let changed = execute(
            &self.pool,
            "toggle_item",
            TOGGLE_ITEM_SQL,
            params![item_id, list_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn items_mark_all_done(&mut self, list_id: ListId) -> StoreResult<bool> {
        let changed = execute(
            &self.pool,
            "mark_all_done",
            MARK_ALL_DONE_SQL,
            params![list_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn item_delete(&mut self, list_id: ListId, item_id: ItemId) -> StoreResult<bool> {
        let changed = execute(
            &self.pool,
            "delete_item",
            DELETE_ITEM_SQL,
            params![item_id, list_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn item_add(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        let changed = execute(
            &self.pool,
            "add_item",
            ADD_ITEM_SQL,
            params![title, list_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn list_add(&mut self, title: &str) -> StoreResult<bool> {
        match execute(
            &self.pool,
            "add_list",
            ADD_LIST_SQL,
            params![title, title_key(title), self.username],
        ) {
            Ok(changed) => Ok(changed > 0),
            Err(err) if err.is_unique_violation() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn list_destroy(&mut self, list_id: ListId) -> StoreResult<bool> {
        let changed = execute(
            &self.pool,
            "destroy_list",
            DESTROY_LIST_SQL,
            params![list_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn list_set_title(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        let changed = execute(
            &self.pool,
            "set_list_title",
            SET_TITLE_SQL,
            params![title, title_key(title), list_id, self.username],
        )
        .map_err(|err| StoreError::from_db_with_title(err, title))?;
        Ok(changed > 0)
    }

    fn list_title_exists(&self, title: &str) -> StoreResult<bool> {
        let found = query_optional(
            &self.pool,
            "list_title_exists",
            TITLE_EXISTS_SQL,
            params![title, self.username],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(found.is_some())
    }

    fn verify_credentials(&self, username: &str, password: &str) -> StoreResult<bool> {
        let stored = query_optional(
            &self.pool,
            "user_password",
            USER_PASSWORD_SQL,
            [username],
            |row| row.get::<_, String>(0),
        )?;

        let (hash, known_user) = match stored.as_deref() {
            Some(hash) => (hash, true),
            None => (DUMMY_PASSWORD_HASH, false),
        };
        let matched = verify_password(password, hash)
            .map_err(|err| StoreError::Credential(err.to_string()))?;
        Ok(known_user && matched)
    }
}

/// Runs two fetches on separate threads (and pooled connections) and waits
/// for both, surfacing the first failure.
fn fetch_both<A, B, L, R>(left: L, right: R) -> StoreResult<(A, B)>
where
    A: Send,
    B: Send,
    L: FnOnce() -> StoreResult<A>,
    R: FnOnce() -> StoreResult<B> + Send,
{
    thread::scope(|scope| {
        let right = scope.spawn(right);
        let left = left();
        let right = right
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload));
        Ok((left?, right?))
    })
}

fn attach_items(lists: Vec<TodoList>, items: Vec<(ListId, TodoItem)>) -> Vec<TodoList> {
    let mut by_list: HashMap<ListId, Vec<TodoItem>> = HashMap::new();
    for (list_id, item) in items {
        by_list.entry(list_id).or_default().push(item);
    }

    lists
        .into_iter()
        .map(|mut list| {
            list.items = by_list.remove(&list.id).unwrap_or_default();
            list
        })
        .collect()
}

fn parse_list_row(row: &Row<'_>) -> rusqlite::Result<TodoList> {
    Ok(TodoList::new(row.get("id")?, row.get::<_, String>("title")?))
}

fn parse_item_row(row: &Row<'_>) -> rusqlite::Result<(ListId, TodoItem)> {
    Ok((
        row.get("todolist_id")?,
        TodoItem {
            id: row.get("id")?,
            title: row.get("title")?,
            done: row.get("done")?,
        },
    ))
}
