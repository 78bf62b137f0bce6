//! Client-side models
//!
//! Mirror the server's camelCase view shapes. Server-owned fields are
//! optional so a fresh model can be sent without them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub text: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub item_type: i32,
    pub flags: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub view_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
    pub text: String,
    #[serde(rename = "type")]
    pub comment_type: i32,
    pub flags: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A reply to `parent_id`
    pub fn reply(text: impl Into<String>, parent_id: i64) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(text)
        }
    }
}

/// One node of an item's comment forest
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    #[serde(default)]
    pub replies: Vec<CommentThread>,
}

impl CommentThread {
    /// Comments in this thread, the root included
    pub fn comment_count(&self) -> usize {
        1 + self.replies.iter().map(CommentThread::comment_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_item_omits_server_fields() {
        let value = serde_json::to_value(Item::new("Quake")).unwrap();
        assert_eq!(value["title"], "Quake");
        assert_eq!(value["type"], 0);
        assert!(value.get("id").is_none());
        assert!(value.get("userId").is_none());
        assert!(value.get("createdDate").is_none());
    }

    #[test]
    fn test_thread_deserializes_nested_replies() {
        let thread: CommentThread = serde_json::from_value(json!({
            "id": 1,
            "itemId": 9,
            "text": "root",
            "type": 0,
            "flags": 0,
            "userId": "u",
            "parentId": null,
            "createdDate": "2016-01-01T00:00:00Z",
            "lastModifiedDate": "2016-01-01T00:00:00Z",
            "replies": [
                { "id": 2, "itemId": 9, "text": "reply", "parentId": 1, "replies": [] }
            ]
        }))
        .unwrap();

        assert_eq!(thread.comment.id, Some(1));
        assert_eq!(thread.replies[0].comment.parent_id, Some(1));
        assert_eq!(thread.comment_count(), 2);
    }

    #[test]
    fn test_thread_at_server_depth_limit_deserializes() {
        // Mirrors the server's reply depth limit
        const DEPTH: i64 = 32;

        let mut node = json!({ "id": DEPTH, "text": "leaf", "replies": [] });
        for id in (1..DEPTH).rev() {
            node = json!({ "id": id, "text": "reply", "replies": [node] });
        }
        let body = serde_json::to_string_pretty(&node).unwrap();

        let thread: CommentThread = serde_json::from_str(&body).unwrap();
        assert_eq!(thread.comment_count(), DEPTH as usize);
    }
}
