//! User Repository
//!
//! Users are an external identity; this store only keeps enough of them to
//! satisfy ownership references.

use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{timestamp_now, DomainError, DomainResult, User};
use super::db::{db_err, from_millis, to_millis};

const USER_COLUMNS: &str = "id, user_name, email, display_name, created_date, last_modified_date";

#[derive(Clone)]
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.find_one("id", id).await
    }

    pub async fn find_by_user_name(&self, user_name: &str) -> DomainResult<Option<User>> {
        self.find_one("user_name", user_name).await
    }

    async fn find_one(&self, column: &str, value: &str) -> DomainResult<Option<User>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column))
            .map_err(db_err)?;
        let mut rows = stmt.query(params![value]).map_err(db_err)?;

        let user = match rows.next().map_err(db_err)? {
            Some(row) => Some(row_to_user(row)?),
            None => None,
        };
        Ok(user)
    }

    /// Insert a user with a freshly generated id. User names are unique.
    pub async fn create(&self, user_name: &str, email: Option<&str>) -> DomainResult<User> {
        let conn = self.conn.lock().await;
        let now = timestamp_now();

        let taken = conn
            .query_row("SELECT 1 FROM users WHERE user_name = ?", params![user_name], |_| Ok(()))
            .optional()
            .map_err(db_err)?
            .is_some();
        if taken {
            return Err(DomainError::Conflict(format!("User {} already exists", user_name)));
        }

        let id: String = conn
            .query_row("SELECT lower(hex(randomblob(16)))", [], |row| row.get(0))
            .map_err(db_err)?;

        conn.execute(
            "INSERT INTO users (id, user_name, email, display_name, created_date, last_modified_date) VALUES (?, ?, ?, ?, ?, ?)",
            params![id, user_name, email, user_name, to_millis(&now), to_millis(&now)],
        )
        .map_err(db_err)?;

        Ok(User {
            id,
            user_name: user_name.to_string(),
            email: email.map(str::to_string),
            display_name: Some(user_name.to_string()),
            created_date: now,
            last_modified_date: now,
        })
    }

    /// Look up a user by name, creating it if absent
    pub async fn ensure(&self, user_name: &str) -> DomainResult<User> {
        if let Some(user) = self.find_by_user_name(user_name).await? {
            return Ok(user);
        }
        tracing::info!(user_name, "Creating user");
        self.create(user_name, None).await
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> DomainResult<User> {
    Ok(User {
        id: row.get(0).map_err(db_err)?,
        user_name: row.get(1).map_err(db_err)?,
        email: row.get(2).map_err(db_err)?,
        display_name: row.get(3).map_err(db_err)?,
        created_date: from_millis(row.get(4).map_err(db_err)?)?,
        last_modified_date: from_millis(row.get(5).map_err(db_err)?)?,
    })
}
