//! Comment Entity
//!
//! Comments hang off an Item and may reply to another comment on the same
//! Item. Parent links are stored flat (`parent_id`); reply trees are rebuilt
//! on demand with [`build_threads`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// Deepest allowed reply chain, counting the top-level comment as 1
pub const MAX_REPLY_DEPTH: u32 = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub item_id: i64,
    pub text: String,
    pub comment_type: i32,
    pub flags: i32,
    /// Author
    pub user_id: String,
    /// Comment this one replies to (None = top level)
    pub parent_id: Option<i64>,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
}

impl Comment {
    /// Create a new, not yet persisted comment (id 0)
    pub fn new(item_id: i64, text: String, user_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            item_id,
            text,
            comment_type: 0,
            flags: 0,
            user_id,
            parent_id: None,
            created_date: now,
            last_modified_date: now,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Entity for Comment {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// A comment together with its replies, recursively
#[derive(Debug, Clone, PartialEq)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<CommentThread>,
}

impl CommentThread {
    /// Number of comments in this thread, including the root
    pub fn comment_count(&self) -> usize {
        1 + self.replies.iter().map(CommentThread::comment_count).sum::<usize>()
    }
}

/// Rebuild reply trees from a flat list of comments.
///
/// Siblings are ordered by creation time, then id. A comment whose parent is
/// not in `comments` is treated as a root. Comments caught in a parent cycle
/// are unreachable from any root and are dropped.
pub fn build_threads(mut comments: Vec<Comment>) -> Vec<CommentThread> {
    comments.sort_by(|a, b| a.created_date.cmp(&b.created_date).then(a.id.cmp(&b.id)));

    let ids: HashSet<i64> = comments.iter().map(|c| c.id).collect();
    let mut children: HashMap<i64, Vec<Comment>> = HashMap::new();
    let mut roots = Vec::new();

    for comment in comments {
        match comment.parent_id {
            Some(pid) if ids.contains(&pid) => children.entry(pid).or_default().push(comment),
            _ => roots.push(comment),
        }
    }

    roots
        .into_iter()
        .map(|root| attach_replies(root, &mut children))
        .collect()
}

fn attach_replies(comment: Comment, children: &mut HashMap<i64, Vec<Comment>>) -> CommentThread {
    let replies = children
        .remove(&comment.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach_replies(child, children))
        .collect();
    CommentThread { comment, replies }
}
