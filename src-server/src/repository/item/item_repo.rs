//! Item Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Item CRUD operations.
//! Ranked listings live in item_ranking.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Item, DomainError, DomainResult};
use super::super::db::{db_err, from_millis, to_millis};
use super::super::traits::Repository;

pub(super) const ITEM_COLUMNS: &str = "id, title, description, text, notes, item_type, flags, user_id, view_count, created_date, last_modified_date";

/// SQLite implementation of Item repository
#[derive(Clone)]
pub struct ItemRepository {
    pub(super) conn: Arc<Mutex<Connection>>,
}

impl ItemRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Number of stored items
    pub async fn count(&self) -> DomainResult<i64> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .map_err(db_err)
    }
}

#[async_trait]
impl Repository<Item> for ItemRepository {
    async fn create(&self, entity: &Item) -> DomainResult<Item> {
        let conn = self.conn.lock().await;

        conn.execute(
            "INSERT INTO items (title, description, text, notes, item_type, flags, user_id, view_count, created_date, last_modified_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.title,
                entity.description,
                entity.text,
                entity.notes,
                entity.item_type,
                entity.flags,
                entity.user_id,
                entity.view_count,
                to_millis(&entity.created_date),
                to_millis(&entity.last_modified_date),
            ],
        )
        .map_err(db_err)?;

        let mut item = entity.clone();
        item.id = conn.last_insert_rowid();
        Ok(item)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Item>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS))
            .map_err(db_err)?;
        let mut rows = stmt.query(params![id]).map_err(db_err)?;

        let item = match rows.next().map_err(db_err)? {
            Some(row) => Some(row_to_item(row)?),
            None => None,
        };
        Ok(item)
    }

    async fn update(&self, entity: &Item) -> DomainResult<Item> {
        let conn = self.conn.lock().await;

        // created_date and view_count are server-owned and never rewritten here
        let changed = conn
            .execute(
                "UPDATE items SET title = ?, description = ?, text = ?, notes = ?, item_type = ?, flags = ?, user_id = ?, last_modified_date = ? WHERE id = ?",
                params![
                    entity.title,
                    entity.description,
                    entity.text,
                    entity.notes,
                    entity.item_type,
                    entity.flags,
                    entity.user_id,
                    to_millis(&entity.last_modified_date),
                    entity.id,
                ],
            )
            .map_err(db_err)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Item {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let tx = conn.unchecked_transaction().map_err(db_err)?;

        // Manual cascade: the item's comments go with it
        tx.execute("DELETE FROM comments WHERE item_id = ?", params![id])
            .map_err(db_err)?;
        tx.execute("DELETE FROM items WHERE id = ?", params![id])
            .map_err(db_err)?;

        tx.commit().map_err(db_err)
    }
}

/// Look up whether an item exists, on an already locked connection
pub(crate) fn item_exists(conn: &Connection, id: i64) -> DomainResult<bool> {
    conn.query_row("SELECT 1 FROM items WHERE id = ?", params![id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
        .map_err(db_err)
}

/// Convert a database row to Item
pub(super) fn row_to_item(row: &rusqlite::Row<'_>) -> DomainResult<Item> {
    Ok(Item {
        id: row.get(0).map_err(db_err)?,
        title: row.get(1).map_err(db_err)?,
        description: row.get(2).map_err(db_err)?,
        text: row.get(3).map_err(db_err)?,
        notes: row.get(4).map_err(db_err)?,
        item_type: row.get(5).map_err(db_err)?,
        flags: row.get(6).map_err(db_err)?,
        user_id: row.get(7).map_err(db_err)?,
        view_count: row.get(8).map_err(db_err)?,
        created_date: from_millis(row.get(9).map_err(db_err)?)?,
        last_modified_date: from_millis(row.get(10).map_err(db_err)?)?,
    })
}
