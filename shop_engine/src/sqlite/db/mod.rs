//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are simple functions (rather than stateful structs) that accept a `&mut SqliteConnection`
//! argument. Callers can obtain a connection from a pool, or open a transaction as the need arises, and call through
//! to the functions without any other changes.
//!
//! Timestamps are written from Rust as RFC 3339 strings in UTC, so they sort lexically and `substr(created_at, 6, 2)`
//! is always the calendar month.
use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod carts;
pub mod orders;
pub mod products;
pub mod users;

/// Opens a connection pool, creating the database file if it does not exist yet.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// Takes the row produced by an `INSERT ... RETURNING` or `UPDATE ... RETURNING` statement.
///
/// Write statements with a `RETURNING` clause must be read with `fetch_all`. The statement only completes, and the
/// implicit transaction only commits, once it has been stepped past its last row. `fetch_one` and `fetch_optional`
/// stop after the first row and leave the write invisible to other pooled connections.
pub(crate) fn first_row<T>(rows: Vec<T>) -> Option<T> {
    rows.into_iter().next()
}
