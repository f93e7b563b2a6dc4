//! Runtime configuration read from the process environment.
//!
//! # Responsibility
//! - Collect database, pool and logging settings in one place.
//!
//! # Invariants
//! - Unset variables fall back to defaults; malformed numbers are errors.

use crate::db::PoolConfig;
use crate::logging::default_log_level;
use std::path::PathBuf;
use thiserror::Error;

pub const DATABASE_PATH_VAR: &str = "TODOS_DATABASE_PATH";
pub const POOL_SIZE_VAR: &str = "TODOS_POOL_SIZE";
pub const BUSY_TIMEOUT_VAR: &str = "TODOS_BUSY_TIMEOUT_MS";
pub const LOG_LEVEL_VAR: &str = "TODOS_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TODOS_LOG_DIR";

const DEFAULT_DATABASE_PATH: &str = "todos.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got `{value}`")]
    InvalidNumber { var: &'static str, value: String },
}

/// Settings shared by every entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub database_path: PathBuf,
    pub pool: PoolConfig,
    pub log_level: String,
    /// Absolute directory for rolling log files; file logging is off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            pool: PoolConfig::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            database_path: non_empty(DATABASE_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            pool: PoolConfig {
                pool_size: parse_number(POOL_SIZE_VAR, non_empty(POOL_SIZE_VAR))?
                    .unwrap_or(defaults.pool.pool_size),
                busy_timeout_ms: parse_number(BUSY_TIMEOUT_VAR, non_empty(BUSY_TIMEOUT_VAR))?
                    .unwrap_or(defaults.pool.busy_timeout_ms),
            },
            log_level: non_empty(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
            log_dir: non_empty(LOG_DIR_VAR).map(PathBuf::from),
        })
    }
}

fn parse_number(var: &'static str, value: Option<String>) -> Result<Option<u32>, ConfigError> {
    value
        .map(|value| {
            let parsed = value.trim().parse::<u32>();
            parsed.map_err(|_| ConfigError::InvalidNumber { var, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.database_path, PathBuf::from("todos.db"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (DATABASE_PATH_VAR, "/var/lib/todos/app.db"),
            (POOL_SIZE_VAR, " 3 "),
            (BUSY_TIMEOUT_VAR, "250"),
            (LOG_LEVEL_VAR, "warn"),
            (LOG_DIR_VAR, "/var/log/todos"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/todos/app.db"));
        assert_eq!(config.pool.pool_size, 3);
        assert_eq!(config.pool.busy_timeout_ms, 250);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/todos")));
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = CoreConfig::from_lookup(lookup_from(&[(POOL_SIZE_VAR, "  ")])).unwrap();
        assert_eq!(config.pool.pool_size, PoolConfig::default().pool_size);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = CoreConfig::from_lookup(lookup_from(&[(POOL_SIZE_VAR, "many")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: POOL_SIZE_VAR,
                value: "many".to_string(),
            }
        );
        assert!(err.to_string().contains(POOL_SIZE_VAR));
    }
}
