//! Core persistence layer for the multi-user todo-list manager.
//!
//! Callers bind a [`TodoStore`] backend to the current user or session and
//! drive it directly or through [`TodoService`].

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::ordering::{is_done_list, partition_lists, sort_by_title, sorted_items, sorted_lists};
pub use model::todo::{title_key, ItemId, ListId, TodoItem, TodoList};
pub use service::todo_service::{
    ListDetail, ListSummary, ServiceError, ServiceResult, TitleKind, TodoService,
};
pub use store::session_store::{SessionData, SessionTodoStore};
pub use store::sqlite_store::SqliteTodoStore;
pub use store::users::register_user;
pub use store::{StoreError, StoreResult, TodoStore};

/// Minimal health-check API for wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
