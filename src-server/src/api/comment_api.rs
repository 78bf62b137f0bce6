//! Comments API
//!
//! Threads are rebuilt from the flat parent index on every read.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::domain::{build_threads, timestamp_now, Comment};
use crate::repository::Repository;
use crate::AppState;
use super::error::ApiError;
use super::identity::CurrentUser;
use super::json::{parse_payload, PrettyJson};
use super::view_model::{CommentThreadViewModel, CommentViewModel};

type CommentResult = Result<PrettyJson<CommentViewModel>, ApiError>;

fn comment_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Comment ID {} has not been found", id))
}

fn required_text(text: Option<String>) -> Result<String, ApiError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ApiError::BadRequest("Comment text is required".to_string())),
    }
}

/// GET /api/items/{id}/comments
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<PrettyJson<Vec<CommentThreadViewModel>>, ApiError> {
    if state.items.find_by_id(item_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Item ID {} has not been found", item_id)));
    }

    let comments = state.comments.list_by_item(item_id).await?;
    let threads = build_threads(comments)
        .into_iter()
        .map(CommentThreadViewModel::from)
        .collect();
    Ok(PrettyJson(threads))
}

/// POST /api/items/{id}/comments
///
/// The author is the acting user; a `parentId` must name a comment on the
/// same item.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<i64>,
    body: Bytes,
) -> CommentResult {
    let cvm: CommentViewModel = parse_payload(&body).ok_or(ApiError::ServerError)?;
    let text = required_text(cvm.text)?;

    let mut comment = Comment::new(item_id, text, user.id.clone(), timestamp_now());
    comment.comment_type = cvm.comment_type;
    comment.flags = cvm.flags;
    comment.parent_id = cvm.parent_id;

    let created = state.comments.create(&comment).await?;
    info!(id = created.id, item_id, author = %user.user_name, "Comment created");
    Ok(PrettyJson(created.into()))
}

/// PUT /api/comments/{id}
///
/// Overwrites text, type and flags.
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> CommentResult {
    let cvm: CommentViewModel = parse_payload(&body).ok_or_else(|| comment_not_found(id))?;
    let mut comment = state.comments.find_by_id(id).await?.ok_or_else(|| comment_not_found(id))?;

    comment.text = required_text(cvm.text)?;
    comment.comment_type = cvm.comment_type;
    comment.flags = cvm.flags;
    comment.last_modified_date = timestamp_now();

    let updated = state.comments.update(&comment).await?;
    info!(id, actor = %actor.user_name, "Comment updated");
    Ok(PrettyJson(updated.into()))
}

/// DELETE /api/comments/{id}
///
/// Replies are deleted with their parent.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.comments.find_by_id(id).await?.is_none() {
        return Err(comment_not_found(id));
    }

    state.comments.delete(id).await?;
    info!(id, actor = %actor.user_name, "Comment deleted");
    Ok(StatusCode::OK)
}
