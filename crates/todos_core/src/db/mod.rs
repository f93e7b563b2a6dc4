//! SQLite storage bootstrap, schema migrations and statement execution.
//!
//! # Responsibility
//! - Open pooled SQLite connections configured for the todo schema.
//! - Apply schema migrations in deterministic order.
//! - Run single statements on a connection acquired for that call only.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Every pooled connection has `foreign_keys=ON`.
//! - Unique-constraint failures are classified by result code, not message text.

use rusqlite::ffi;
use thiserror::Error;

pub mod migrations;
mod pool;
pub mod query;

pub use pool::{open_db_in_memory, open_pool, ConnectionPool, PoolConfig};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Returns whether this failure is a UNIQUE or PRIMARY KEY violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.extended_code,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            ),
            _ => false,
        }
    }
}
