//! Todo use-case service.
//!
//! # Responsibility
//! - Validate titles before they reach a store.
//! - Turn store "did not happen" results into typed service outcomes.
//! - Build list summaries for overview screens.
//!
//! # Invariants
//! - Titles are trimmed and must hold 1..=100 characters.
//! - Service APIs never bypass the store contract.

use crate::model::todo::{ItemId, ListId, TodoItem, TodoList, MAX_TITLE_CHARS};
use crate::store::{StoreError, TodoStore};
use thiserror::Error;

/// Service error for todo use-cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Title failed length validation; carries the user-facing message.
    #[error("{0}")]
    InvalidTitle(String),

    #[error("list title must be unique: {0}")]
    DuplicateTitle(String),

    #[error("not found")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Which kind of title is being validated; selects the error wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKind {
    List,
    Item,
}

/// Overview row for one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub list: TodoList,
    pub count_all: usize,
    pub count_done: usize,
    pub is_done: bool,
}

/// A list whose items are already in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDetail {
    pub list: TodoList,
    pub is_done: bool,
}

/// Todo service facade over store implementations.
pub struct TodoService<S: TodoStore> {
    store: S,
}

impl<S: TodoStore> TodoService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// All lists in display order with their completion counts.
    pub fn overview(&self) -> ServiceResult<Vec<ListSummary>> {
        Ok(self
            .store
            .list_all()?
            .into_iter()
            .map(|list| ListSummary {
                count_all: list.items.len(),
                count_done: list.count_done(),
                is_done: list.is_done(),
                list,
            })
            .collect())
    }

    /// One list with sorted items.
    pub fn list_detail(&self, list_id: ListId) -> ServiceResult<ListDetail> {
        let mut list = self
            .store
            .list_load(list_id)?
            .ok_or(ServiceError::NotFound)?;
        list.items = self.store.items_sorted(&list)?;
        Ok(ListDetail {
            is_done: list.is_done(),
            list,
        })
    }

    /// Creates a list after validating and de-duplicating its title.
    pub fn create_list(&mut self, title: &str) -> ServiceResult<()> {
        let title = validate_title(title, TitleKind::List)?;
        if self.store.list_title_exists(title)? || !self.store.list_add(title)? {
            return Err(ServiceError::DuplicateTitle(title.to_string()));
        }
        Ok(())
    }

    /// Renames a list after validating and de-duplicating its title.
    pub fn rename_list(&mut self, list_id: ListId, title: &str) -> ServiceResult<()> {
        let title = validate_title(title, TitleKind::List)?;
        if self.store.list_title_exists(title)? {
            return Err(ServiceError::DuplicateTitle(title.to_string()));
        }
        match self.store.list_set_title(list_id, title) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ServiceError::NotFound),
            Err(err) if err.is_unique_violation() => {
                Err(ServiceError::DuplicateTitle(title.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn destroy_list(&mut self, list_id: ListId) -> ServiceResult<()> {
        found(self.store.list_destroy(list_id)?)
    }

    /// Adds an item to an existing list.
    pub fn add_item(&mut self, list_id: ListId, title: &str) -> ServiceResult<()> {
        if self.store.list_load(list_id)?.is_none() {
            return Err(ServiceError::NotFound);
        }
        let title = validate_title(title, TitleKind::Item)?;
        found(self.store.item_add(list_id, title)?)
    }

    /// Toggles an item and returns its new state.
    pub fn toggle_item(&mut self, list_id: ListId, item_id: ItemId) -> ServiceResult<TodoItem> {
        found(self.store.item_toggle(list_id, item_id)?)?;
        self.store
            .item_load(list_id, item_id)?
            .ok_or(ServiceError::NotFound)
    }

    pub fn delete_item(&mut self, list_id: ListId, item_id: ItemId) -> ServiceResult<()> {
        found(self.store.item_delete(list_id, item_id)?)
    }

    /// Marks every item of a list done; an empty list reports `NotFound`.
    pub fn complete_all(&mut self, list_id: ListId) -> ServiceResult<()> {
        found(self.store.items_mark_all_done(list_id)?)
    }

    /// Checks a username/password pair.
    pub fn sign_in(&self, username: &str, password: &str) -> ServiceResult<()> {
        if self.store.verify_credentials(username.trim(), password)? {
            Ok(())
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    }
}

/// Trims `title` and checks its length in characters.
pub fn validate_title(title: &str, kind: TitleKind) -> ServiceResult<&str> {
    let trimmed = title.trim();
    let (required, range) = match kind {
        TitleKind::List => (
            "The list title is required.",
            "List title must be between 1 and 100 characters.",
        ),
        TitleKind::Item => (
            "The todo title is required.",
            "Todo title must be between 1 and 100 characters.",
        ),
    };

    if trimmed.is_empty() {
        return Err(ServiceError::InvalidTitle(required.to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(ServiceError::InvalidTitle(range.to_string()));
    }
    Ok(trimmed)
}

fn found(happened: bool) -> ServiceResult<()> {
    if happened {
        Ok(())
    } else {
        Err(ServiceError::NotFound)
    }
}
