//! Wire shapes
//!
//! View models are what crosses HTTP. The same shape is accepted on input,
//! where every field is optional and server-owned fields are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Comment, CommentThread, Item};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemViewModel {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub text: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub item_type: i32,
    pub flags: i32,
    pub user_id: Option<String>,
    pub view_count: i64,
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl From<Item> for ItemViewModel {
    fn from(item: Item) -> Self {
        Self {
            id: Some(item.id),
            title: Some(item.title),
            description: item.description,
            text: item.text,
            notes: item.notes,
            item_type: item.item_type,
            flags: item.flags,
            user_id: Some(item.user_id),
            view_count: item.view_count,
            created_date: Some(item.created_date),
            last_modified_date: Some(item.last_modified_date),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentViewModel {
    pub id: Option<i64>,
    pub item_id: Option<i64>,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub comment_type: i32,
    pub flags: i32,
    pub user_id: Option<String>,
    pub parent_id: Option<i64>,
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl From<Comment> for CommentViewModel {
    fn from(comment: Comment) -> Self {
        Self {
            id: Some(comment.id),
            item_id: Some(comment.item_id),
            text: Some(comment.text),
            comment_type: comment.comment_type,
            flags: comment.flags,
            user_id: Some(comment.user_id),
            parent_id: comment.parent_id,
            created_date: Some(comment.created_date),
            last_modified_date: Some(comment.last_modified_date),
        }
    }
}

/// A comment with its replies nested beneath it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentThreadViewModel {
    #[serde(flatten)]
    pub comment: CommentViewModel,
    pub replies: Vec<CommentThreadViewModel>,
}

impl From<CommentThread> for CommentThreadViewModel {
    fn from(thread: CommentThread) -> Self {
        Self {
            comment: thread.comment.into(),
            replies: thread.replies.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timestamp_now;

    #[test]
    fn test_item_view_uses_camel_case_and_type() {
        let mut item = Item::new("T".to_string(), "u1".to_string(), timestamp_now());
        item.id = 3;
        item.item_type = 2;

        let json = serde_json::to_value(ItemViewModel::from(item)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["type"], 2);
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["viewCount"], 0);
        assert!(json["createdDate"].is_string());
        assert!(json.get("comments").is_none());
    }

    #[test]
    fn test_partial_input_deserializes() {
        let ivm: ItemViewModel =
            serde_json::from_str(r#"{"title":"T","userId":"ignored-client-value"}"#).unwrap();
        assert_eq!(ivm.title.as_deref(), Some("T"));
        assert_eq!(ivm.user_id.as_deref(), Some("ignored-client-value"));
        assert_eq!(ivm.id, None);
        assert_eq!(ivm.item_type, 0);
    }
}
