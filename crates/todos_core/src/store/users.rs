//! Credential records for the relational backend.
//!
//! Sign-in verification lives on `TodoStore::verify_credentials`; this module
//! only provisions and removes the rows it reads.

use super::{StoreError, StoreResult};
use crate::auth::password::hash_password;
use crate::db::query::{execute, query_optional};
use crate::db::ConnectionPool;

const INSERT_USER_SQL: &str = "INSERT INTO users (username, password) VALUES (?1, ?2);";
const DELETE_USER_SQL: &str = "DELETE FROM users WHERE username = ?1;";
const USER_EXISTS_SQL: &str = "SELECT 1 FROM users WHERE username = ?1;";

/// Stores a new credential record with an Argon2id hash of `password`.
///
/// # Errors
/// - `StoreError::UserExists` when `username` is already registered.
pub fn register_user(pool: &ConnectionPool, username: &str, password: &str) -> StoreResult<()> {
    let hash = hash_password(password).map_err(|err| StoreError::Credential(err.to_string()))?;
    match execute(pool, "insert_user", INSERT_USER_SQL, [username, hash.as_str()]) {
        Ok(_) => Ok(()),
        Err(err) if err.is_unique_violation() => Err(StoreError::UserExists(username.to_string())),
        Err(err) => Err(err.into()),
    }
}

/// Removes a user; their lists and items go with them.
pub fn delete_user(pool: &ConnectionPool, username: &str) -> StoreResult<bool> {
    Ok(execute(pool, "delete_user", DELETE_USER_SQL, [username])? > 0)
}

pub fn user_exists(pool: &ConnectionPool, username: &str) -> StoreResult<bool> {
    let found = query_optional(pool, "user_exists", USER_EXISTS_SQL, [username], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(found.is_some())
}
