//! Comment Repository
//!
//! SQLite-backed storage for comments. Reply structure is kept as a flat
//! `parent_id` column; callers rebuild trees with `domain::build_threads`.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Comment, DomainError, DomainResult, MAX_REPLY_DEPTH};
use super::db::{db_err, from_millis, to_millis};
use super::item::item_exists;
use super::traits::Repository;

const COMMENT_COLUMNS: &str = "id, item_id, text, comment_type, flags, user_id, parent_id, created_date, last_modified_date";

#[derive(Clone)]
pub struct CommentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CommentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// All comments of an item, oldest first
    pub async fn list_by_item(&self, item_id: i64) -> DomainResult<Vec<Comment>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM comments WHERE item_id = ? ORDER BY created_date ASC, id ASC",
                COMMENT_COLUMNS
            ))
            .map_err(db_err)?;
        let mut rows = stmt.query(params![item_id]).map_err(db_err)?;

        let mut comments = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            comments.push(row_to_comment(row)?);
        }
        Ok(comments)
    }
}

#[async_trait]
impl Repository<Comment> for CommentRepository {
    /// Rejects replies whose parent is missing, on another item, or already
    /// at the deepest allowed level
    async fn create(&self, entity: &Comment) -> DomainResult<Comment> {
        let conn = self.conn.lock().await;

        if !item_exists(&conn, entity.item_id)? {
            return Err(DomainError::NotFound(format!(
                "Item ID {} has not been found",
                entity.item_id
            )));
        }

        if let Some(parent_id) = entity.parent_id {
            let parent_item: Option<i64> = conn
                .query_row(
                    "SELECT item_id FROM comments WHERE id = ?",
                    params![parent_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(db_err)?;

            match parent_item {
                None => {
                    return Err(DomainError::InvalidInput(format!(
                        "Parent comment {} does not exist",
                        parent_id
                    )))
                }
                Some(item_id) if item_id != entity.item_id => {
                    return Err(DomainError::InvalidInput(format!(
                        "Parent comment {} belongs to another item",
                        parent_id
                    )))
                }
                Some(_) => {}
            }

            if parent_depth(&conn, parent_id)? >= i64::from(MAX_REPLY_DEPTH) {
                return Err(DomainError::InvalidInput(format!(
                    "Replies may nest at most {} levels deep",
                    MAX_REPLY_DEPTH
                )));
            }
        }

        conn.execute(
            "INSERT INTO comments (item_id, text, comment_type, flags, user_id, parent_id, created_date, last_modified_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.item_id,
                entity.text,
                entity.comment_type,
                entity.flags,
                entity.user_id,
                entity.parent_id,
                to_millis(&entity.created_date),
                to_millis(&entity.last_modified_date),
            ],
        )
        .map_err(db_err)?;

        let mut comment = entity.clone();
        comment.id = conn.last_insert_rowid();
        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Comment>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM comments WHERE id = ?", COMMENT_COLUMNS))
            .map_err(db_err)?;
        let mut rows = stmt.query(params![id]).map_err(db_err)?;

        let comment = match rows.next().map_err(db_err)? {
            Some(row) => Some(row_to_comment(row)?),
            None => None,
        };
        Ok(comment)
    }

    /// Item, author and parent are fixed at creation
    async fn update(&self, entity: &Comment) -> DomainResult<Comment> {
        let conn = self.conn.lock().await;

        let changed = conn
            .execute(
                "UPDATE comments SET text = ?, comment_type = ?, flags = ?, last_modified_date = ? WHERE id = ?",
                params![
                    entity.text,
                    entity.comment_type,
                    entity.flags,
                    to_millis(&entity.last_modified_date),
                    entity.id,
                ],
            )
            .map_err(db_err)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Comment {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let tx = conn.unchecked_transaction().map_err(db_err)?;

        // Manual cascade: delete all replies first
        tx.execute(
            "DELETE FROM comments WHERE id IN (
                WITH RECURSIVE descendants AS (
                    SELECT id FROM comments WHERE parent_id = ?
                    UNION ALL
                    SELECT c.id FROM comments c
                    JOIN descendants d ON c.parent_id = d.id
                )
                SELECT id FROM descendants
            )",
            params![id],
        )
        .map_err(db_err)?;

        tx.execute("DELETE FROM comments WHERE id = ?", params![id])
            .map_err(db_err)?;

        tx.commit().map_err(db_err)
    }
}

/// Length of the reply chain ending at `comment_id`, top-level comment
/// included. The walk stops one level past the limit.
fn parent_depth(conn: &Connection, comment_id: i64) -> DomainResult<i64> {
    conn.query_row(
        "WITH RECURSIVE ancestors(id, parent_id, depth) AS (
            SELECT id, parent_id, 1 FROM comments WHERE id = ?1
            UNION ALL
            SELECT c.id, c.parent_id, a.depth + 1
            FROM comments c JOIN ancestors a ON c.id = a.parent_id
            WHERE a.depth <= ?2
        )
        SELECT COALESCE(MAX(depth), 0) FROM ancestors",
        params![comment_id, i64::from(MAX_REPLY_DEPTH)],
        |row| row.get(0),
    )
    .map_err(db_err)
}

fn row_to_comment(row: &rusqlite::Row<'_>) -> DomainResult<Comment> {
    Ok(Comment {
        id: row.get(0).map_err(db_err)?,
        item_id: row.get(1).map_err(db_err)?,
        text: row.get(2).map_err(db_err)?,
        comment_type: row.get(3).map_err(db_err)?,
        flags: row.get(4).map_err(db_err)?,
        user_id: row.get(5).map_err(db_err)?,
        parent_id: row.get(6).map_err(db_err)?,
        created_date: from_millis(row.get(7).map_err(db_err)?)?,
        last_modified_date: from_millis(row.get(8).map_err(db_err)?)?,
    })
}
