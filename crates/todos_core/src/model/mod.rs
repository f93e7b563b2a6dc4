//! Domain model for todo lists and their items.
//!
//! # Responsibility
//! - Define the list/item shapes returned by every store backend.
//! - Own the done/undone partitioning and title ordering rules.
//!
//! # Invariants
//! - A list exclusively owns its items.
//! - Ordering is computed here, never inside a storage engine.

pub mod ordering;
pub mod todo;
