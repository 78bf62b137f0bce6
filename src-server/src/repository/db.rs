//! Database Connection and Setup
//!
//! Manages the SQLite connection and schema migrations.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared handle to the single SQLite connection
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Connection>>,
}

impl DbState {
    /// Connection handle for building repositories
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}

/// Open (or create) the database at `db_path` and run migrations.
///
/// `:memory:` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = Connection::open(db_path)
        .map_err(|e| format!("Failed to open db {}: {}", db_path.display(), e))?;

    run_migrations(&conn)?;

    Ok(DbState {
        conn: Arc::new(Mutex::new(conn)),
    })
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| format!("Failed to enable foreign keys: {}", e))?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            user_name TEXT NOT NULL UNIQUE,
            email TEXT,
            display_name TEXT,
            created_date INTEGER NOT NULL,
            last_modified_date INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            text TEXT,
            notes TEXT,
            item_type INTEGER NOT NULL DEFAULT 0,
            flags INTEGER NOT NULL DEFAULT 0,
            user_id TEXT NOT NULL REFERENCES users(id),
            view_count INTEGER NOT NULL DEFAULT 0,
            created_date INTEGER NOT NULL,
            last_modified_date INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id INTEGER NOT NULL REFERENCES items(id),
            text TEXT NOT NULL,
            comment_type INTEGER NOT NULL DEFAULT 0,
            flags INTEGER NOT NULL DEFAULT 0,
            user_id TEXT NOT NULL REFERENCES users(id),
            parent_id INTEGER REFERENCES comments(id),
            created_date INTEGER NOT NULL,
            last_modified_date INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_items_created ON items(created_date);
        CREATE INDEX IF NOT EXISTS idx_items_views ON items(view_count);
        CREATE INDEX IF NOT EXISTS idx_comments_item ON comments(item_id);
        CREATE INDEX IF NOT EXISTS idx_comments_parent ON comments(parent_id);",
    )
    .map_err(|e| format!("Failed to migrate schema: {}", e))?;

    Ok(())
}

/// Map a SQLite error into the domain
pub(crate) fn db_err(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

/// Timestamps are stored as milliseconds since the Unix epoch
pub(crate) fn to_millis(ts: &DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> DomainResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| DomainError::Internal(format!("Timestamp out of range: {}", ms)))
}
