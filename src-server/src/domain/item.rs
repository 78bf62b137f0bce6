//! Item Entity
//!
//! A catalog listing (game) owned by a single user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, assigned by the store
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Free-text body
    pub text: Option<String>,
    pub notes: Option<String>,
    pub item_type: i32,
    pub flags: i32,
    /// Owning user
    pub user_id: String,
    /// Server-maintained, never written by clients
    pub view_count: i64,
    /// Set once on creation
    pub created_date: DateTime<Utc>,
    /// Refreshed on every mutation
    pub last_modified_date: DateTime<Utc>,
}

/// Client-editable fields of an Item
///
/// Exactly these fields are overwritten by an update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemEdit {
    pub title: String,
    pub description: Option<String>,
    pub text: Option<String>,
    pub notes: Option<String>,
    pub item_type: i32,
    pub flags: i32,
    pub user_id: String,
}

impl Item {
    /// Create a new, not yet persisted item (id 0)
    ///
    /// Both timestamps take the same clock reading.
    pub fn new(title: String, user_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            title,
            description: None,
            text: None,
            notes: None,
            item_type: 0,
            flags: 0,
            user_id,
            view_count: 0,
            created_date: now,
            last_modified_date: now,
        }
    }

    /// Overwrite the editable fields and refresh the modification time.
    /// `created_date` and `view_count` are left alone.
    pub fn apply_edit(&mut self, edit: ItemEdit, now: DateTime<Utc>) {
        self.user_id = edit.user_id;
        self.description = edit.description;
        self.flags = edit.flags;
        self.notes = edit.notes;
        self.text = edit.text;
        self.title = edit.title;
        self.item_type = edit.item_type;
        self.last_modified_date = now;
    }
}

impl Entity for Item {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }
}
