//! Colloquy Storage Layer
//!
//! Implements the domain store traits on top of SQLite.
//!
//! # Architecture
//!
//! - One table per resource, ids stored as canonical UUID strings
//! - Nested profile data (locations, employments, educations) in JSON columns
//! - Relationship sets in a single `relationships` table keyed by
//!   `(actor_id, set_name, target_id)`, so membership changes are atomic
//!   single-statement writes
//! - `answers.vote_count` updated with in-place `vote_count + ?` increments
//!
//! # Examples
//!
//! ```no_run
//! use colloquy_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for use
//! ```

#![warn(missing_docs)]

mod answers;
mod comments;
mod questions;
mod relationships;
mod topics;
mod users;

use colloquy_domain::{EntityId, Pagination};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unique key already taken
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// JSON column encoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// SQLite-based implementation of every store trait
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store between tasks
/// behind a mutex, or give each thread its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use colloquy_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("colloquy.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Whether a row with `id` exists in `table`
    fn row_exists(&self, table: &str, id: EntityId) -> Result<bool, StoreError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", table);
        let exists = self
            .conn
            .query_row(&sql, params![id.to_string()], |row| row.get(0))?;
        Ok(exists)
    }
}

/// Current timestamp in seconds since Unix epoch
pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Wrap a decoding failure so it can travel through rusqlite row mappers
pub(crate) fn conversion_error(idx: usize, ty: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(StoreError::InvalidData(message)))
}

/// Read an id column
pub(crate) fn id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<EntityId> {
    let raw: String = row.get(idx)?;
    EntityId::from_string(&raw).map_err(|e| conversion_error(idx, Type::Text, e))
}

/// Read a nullable id column
pub(crate) fn opt_id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<EntityId>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| EntityId::from_string(&s).map_err(|e| conversion_error(idx, Type::Text, e)))
        .transpose()
}

/// Read a JSON column
pub(crate) fn json_at<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, Type::Text, e.to_string()))
}

/// Encode a value for a JSON column
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

/// `LIMIT` and `OFFSET` bind values; SQLite reads a negative limit as
/// unbounded, so out-of-range values saturate instead of wrapping
pub(crate) fn sql_window(pagination: &Pagination) -> (i64, i64) {
    let limit = i64::try_from(pagination.per_page()).unwrap_or(i64::MAX);
    let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

/// `LIKE` pattern matching `text` anywhere; use with `ESCAPE '\'`
pub(crate) fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_sql_window_never_goes_negative() {
        let huge = Pagination::new(Some(usize::MAX), Some(usize::MAX));
        let (limit, offset) = sql_window(&huge);
        assert!(limit > 0);
        assert_eq!(offset, i64::MAX);

        assert_eq!(sql_window(&Pagination::new(Some(3), Some(20))), (20, 40));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store.initialize_schema().unwrap();
        assert!(!store.row_exists("users", EntityId::new()).unwrap());
    }
}
