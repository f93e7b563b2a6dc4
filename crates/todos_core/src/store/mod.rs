//! Store contract shared by every persistence backend.
//!
//! # Responsibility
//! - Define the operation set callers use to read and mutate todo data.
//! - Classify failures into expected outcomes and propagated errors.
//!
//! # Invariants
//! - Every backend instance is bound to one user (or session) at construction
//!   and only ever sees that user's lists and items.
//! - "Did not happen" outcomes (missing row, duplicate title on add) are
//!   `Ok(false)` / `Ok(None)`, never errors.
//! - Reads return owned copies; mutating a returned value never changes
//!   stored state.
//! - Ordering follows `model::ordering` in every backend.

use crate::db::DbError;
use crate::model::todo::{ItemId, ListId, TodoItem, TodoList};
use thiserror::Error;

pub mod seed;
pub mod session_store;
pub mod sqlite_store;
pub mod users;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures that store operations propagate to their caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another list of the bound user already has this title.
    #[error("list title already exists: {title}")]
    UniqueViolation { title: String },

    /// A credential record already exists for this username.
    #[error("user already exists: {0}")]
    UserExists(String),

    /// Storage engine or connection failure.
    #[error("{0}")]
    Db(DbError),

    /// Stored credential record could not be interpreted.
    #[error("credential check failed: {0}")]
    Credential(String),

    /// Persisted or fixture data could not be decoded.
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Returns whether the failure is a uniqueness conflict the caller may
    /// report as "title must be unique".
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::UniqueViolation { .. } | Self::UserExists(_) => true,
            Self::Db(err) => err.is_unique_violation(),
            _ => false,
        }
    }

    /// Converts a storage failure, tagging unique violations with `title`.
    pub(crate) fn from_db_with_title(err: DbError, title: &str) -> Self {
        if err.is_unique_violation() {
            Self::UniqueViolation {
                title: title.to_string(),
            }
        } else {
            Self::Db(err)
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(value: r2d2::Error) -> Self {
        Self::Db(DbError::Pool(value))
    }
}

/// Persistence contract for one bound user's todo lists.
pub trait TodoStore {
    /// All lists with their items, not-done lists first, each group by title.
    fn list_all(&self) -> StoreResult<Vec<TodoList>>;

    /// One list with its items, or `None` when the bound user has no such list.
    fn list_load(&self, list_id: ListId) -> StoreResult<Option<TodoList>>;

    /// One item of one list, or `None`.
    fn item_load(&self, list_id: ListId, item_id: ItemId) -> StoreResult<Option<TodoItem>>;

    /// Items of `list`, not-done first, each group by title.
    fn items_sorted(&self, list: &TodoList) -> StoreResult<Vec<TodoItem>>;

    /// Flips `done` on one item.
    fn item_toggle(&mut self, list_id: ListId, item_id: ItemId) -> StoreResult<bool>;

    /// Marks every item of a list done; `false` when nothing changed.
    fn items_mark_all_done(&mut self, list_id: ListId) -> StoreResult<bool>;

    fn item_delete(&mut self, list_id: ListId, item_id: ItemId) -> StoreResult<bool>;

    /// Appends a not-done item; `false` when the list does not exist.
    fn item_add(&mut self, list_id: ListId, title: &str) -> StoreResult<bool>;

    /// Creates an empty list; `false` when the title is already taken.
    fn list_add(&mut self, title: &str) -> StoreResult<bool>;

    /// Deletes a list together with all of its items.
    fn list_destroy(&mut self, list_id: ListId) -> StoreResult<bool>;

    /// Renames a list.
    ///
    /// A title clash with another list is `Err(StoreError::UniqueViolation)`.
    fn list_set_title(&mut self, list_id: ListId, title: &str) -> StoreResult<bool>;

    /// Whether the bound user has a list with exactly `title`.
    fn list_title_exists(&self, title: &str) -> StoreResult<bool>;

    /// Whether `password` matches the stored credential for `username`.
    ///
    /// Unknown users and wrong passwords are both `Ok(false)`.
    fn verify_credentials(&self, username: &str, password: &str) -> StoreResult<bool>;
}

impl<S: TodoStore + ?Sized> TodoStore for Box<S> {
    fn list_all(&self) -> StoreResult<Vec<TodoList>> {
        (**self).list_all()
    }

    fn list_load(&self, list_id: ListId) -> StoreResult<Option<TodoList>> {
        (**self).list_load(list_id)
    }

    fn item_load(&self, list_id: ListId, item_id: ItemId) -> StoreResult<Option<TodoItem>> {
        (**self).item_load(list_id, item_id)
    }

    fn items_sorted(&self, list: &TodoList) -> StoreResult<Vec<TodoItem>> {
        (**self).items_sorted(list)
    }

    fn item_toggle(&mut self, list_id: ListId, item_id: ItemId) -> StoreResult<bool> {
        (**self).item_toggle(list_id, item_id)
    }

    fn items_mark_all_done(&mut self, list_id: ListId) -> StoreResult<bool> {
        (**self).items_mark_all_done(list_id)
    }

    fn item_delete(&mut self, list_id: ListId, item_id: ItemId) -> StoreResult<bool> {
        (**self).item_delete(list_id, item_id)
    }

    fn item_add(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        (**self).item_add(list_id, title)
    }

    fn list_add(&mut self, title: &str) -> StoreResult<bool> {
        (**self).list_add(title)
    }

    fn list_destroy(&mut self, list_id: ListId) -> StoreResult<bool> {
        (**self).list_destroy(list_id)
    }

    fn list_set_title(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        (**self).list_set_title(list_id, title)
    }

    fn list_title_exists(&self, title: &str) -> StoreResult<bool> {
        (**self).list_title_exists(title)
    }

    fn verify_credentials(&self, username: &str, password: &str) -> StoreResult<bool> {
        (**self).verify_credentials(username, password)
    }
}
