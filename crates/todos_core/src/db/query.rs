//! Per-call statement execution over the connection pool.
//!
//! # Responsibility
//! - Check out one connection per statement and release it on every path.
//! - Emit `db_query` debug events with statement label, row count and timing.
//!
//! # Invariants
//! - Parameter values are never logged.
//! - No transaction spans more than one call.

use super::{ConnectionPool, DbError, DbResult};
use log::{debug, warn};
use rusqlite::{Params, Row};
use std::time::Instant;

/// Runs one data-modifying statement and returns the number of changed rows.
pub fn execute<P: Params>(
    pool: &ConnectionPool,
    label: &'static str,
    sql: &str,
    params: P,
) -> DbResult<usize> {
    let started_at = Instant::now();
    let result: DbResult<usize> = pool
        .get()
        .map_err(DbError::from)
        .and_then(|conn| conn.execute(sql, params).map_err(DbError::from));
    log_outcome(label, started_at, result.as_ref().map(|changed| *changed));
    result
}

/// Runs one query and maps every returned row.
pub fn query_rows<T, P, F>(
    pool: &ConnectionPool,
    label: &'static str,
    sql: &str,
    params: P,
    map_row: F,
) -> DbResult<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let started_at = Instant::now();
    let result = pool
        .get()
        .map_err(DbError::from)
        .and_then(|conn| -> DbResult<Vec<T>> {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map(params, map_row)?
                .collect::<rusqlite::Result<Vec<T>>>()?;
            Ok(rows)
        });
    log_outcome(label, started_at, result.as_ref().map(Vec::len));
    result
}

/// Runs one query and maps the first returned row, if any.
pub fn query_optional<T, P, F>(
    pool: &ConnectionPool,
    label: &'static str,
    sql: &str,
    params: P,
    map_row: F,
) -> DbResult<Option<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    Ok(query_rows(pool, label, sql, params, map_row)?
        .into_iter()
        .next())
}

fn log_outcome<E: std::fmt::Display>(
    label: &'static str,
    started_at: Instant,
    outcome: Result<usize, &E>,
) {
    match outcome {
        Ok(rows) => debug!(
            "event=db_query module=db status=ok statement={} rows={} duration_ms={}",
            label,
            rows,
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event=db_query module=db status=error statement={} duration_ms={} error={}",
            label,
            started_at.elapsed().as_millis(),
            err
        ),
    }
}
