//! Item Ranking Operations
//!
//! Top-n listings over the whole item table. Callers clamp `limit`.

use async_trait::async_trait;
use rusqlite::params;

use crate::domain::{Item, DomainResult};
use super::super::db::db_err;
use super::item_repo::{row_to_item, ItemRepository, ITEM_COLUMNS};

/// Trait for ranked item listings
#[async_trait]
pub trait ItemRankingOperations {
    /// Most recently created first
    async fn latest(&self, limit: i64) -> DomainResult<Vec<Item>>;

    /// Highest view count first
    async fn most_viewed(&self, limit: i64) -> DomainResult<Vec<Item>>;

    /// Independent random sample, reshuffled on every call
    async fn random(&self, limit: i64) -> DomainResult<Vec<Item>>;
}

impl ItemRepository {
    async fn query_ordered(&self, order_by: &str, limit: i64) -> DomainResult<Vec<Item>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM items ORDER BY {} LIMIT ?",
                ITEM_COLUMNS, order_by
            ))
            .map_err(db_err)?;
        let mut rows = stmt.query(params![limit.max(0)]).map_err(db_err)?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            items.push(row_to_item(row)?);
        }
        Ok(items)
    }
}

#[async_trait]
impl ItemRankingOperations for ItemRepository {
    async fn latest(&self, limit: i64) -> DomainResult<Vec<Item>> {
        self.query_ordered("created_date DESC, id DESC", limit).await
    }

    async fn most_viewed(&self, limit: i64) -> DomainResult<Vec<Item>> {
        self.query_ordered("view_count DESC, id ASC", limit).await
    }

    async fn random(&self, limit: i64) -> DomainResult<Vec<Item>> {
        // RANDOM() draws a fresh key per row per query
        self.query_ordered("RANDOM()", limit).await
    }
}
