//! Items API
//!
//! REST handlers for `/api/items`, plus the ranked listings
//! `GetLatest`, `GetMostViewed` and `GetRandom`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::{info, warn};

use crate::domain::{timestamp_now, Item, ItemEdit};
use crate::repository::{ItemRankingOperations, Repository};
use crate::AppState;
use super::error::ApiError;
use super::identity::CurrentUser;
use super::json::{parse_payload, PrettyJson};
use super::view_model::ItemViewModel;

/// Count used when a ranked listing is requested without one
pub const DEFAULT_NUMBER_OF_ITEMS: i64 = 5;

/// Upper bound on any ranked listing
pub const MAX_NUMBER_OF_ITEMS: i64 = 100;

type ItemResult = Result<PrettyJson<ItemViewModel>, ApiError>;
type ItemListResult = Result<PrettyJson<Vec<ItemViewModel>>, ApiError>;

fn item_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Item ID {} has not been found", id))
}

fn to_view_list(items: Vec<Item>) -> PrettyJson<Vec<ItemViewModel>> {
    PrettyJson(items.into_iter().map(ItemViewModel::from).collect())
}

/// GET /api/items
///
/// There is no unfiltered listing; callers use the ranked views.
pub async fn list_items() -> ApiError {
    ApiError::NotFound("not found".to_string())
}

/// GET /api/items/{id}
pub async fn get_item(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ItemResult {
    let item = state.items.find_by_id(id).await?.ok_or_else(|| item_not_found(id))?;
    Ok(PrettyJson(item.into()))
}

/// POST /api/items
///
/// Timestamps and ownership come from the server; whatever the client sent
/// for them is discarded.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    body: Bytes,
) -> ItemResult {
    let ivm: ItemViewModel = parse_payload(&body).ok_or(ApiError::ServerError)?;

    let title = match ivm.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => {
            warn!("Rejecting item without a title");
            return Err(ApiError::ServerError);
        }
    };

    let mut item = Item::new(title, user.id.clone(), timestamp_now());
    item.description = ivm.description;
    item.text = ivm.text;
    item.notes = ivm.notes;
    item.item_type = ivm.item_type;
    item.flags = ivm.flags;

    let created = state.items.create(&item).await?;
    info!(id = created.id, owner = %user.user_name, "Item created");
    Ok(PrettyJson(created.into()))
}

/// PUT /api/items/{id}
///
/// Overwrites owner, description, flags, notes, text, title and type, and
/// refreshes the modification time. An omitted `userId` keeps the owner.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> ItemResult {
    let ivm: ItemViewModel = parse_payload(&body).ok_or_else(|| item_not_found(id))?;
    let mut item = state.items.find_by_id(id).await?.ok_or_else(|| item_not_found(id))?;

    let user_id = ivm.user_id.unwrap_or_else(|| item.user_id.clone());
    if user_id != item.user_id && state.users.find_by_id(&user_id).await?.is_none() {
        return Err(ApiError::BadRequest(format!("User {} does not exist", user_id)));
    }

    let title = match ivm.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => {
            warn!(id, "Rejecting item update without a title");
            return Err(ApiError::ServerError);
        }
    };

    item.apply_edit(
        ItemEdit {
            title,
            description: ivm.description,
            text: ivm.text,
            notes: ivm.notes,
            item_type: ivm.item_type,
            flags: ivm.flags,
            user_id,
        },
        timestamp_now(),
    );

    let updated = state.items.update(&item).await?;
    info!(id, actor = %actor.user_name, "Item updated");
    Ok(PrettyJson(updated.into()))
}

/// DELETE /api/items/{id}
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.items.find_by_id(id).await?.is_none() {
        return Err(item_not_found(id));
    }

    state.items.delete(id).await?;
    info!(id, actor = %actor.user_name, "Item deleted");
    Ok(StatusCode::OK)
}

/// GET /api/items/GetLatest
pub async fn get_latest_default(state: State<Arc<AppState>>) -> ItemListResult {
    get_latest(state, Path(DEFAULT_NUMBER_OF_ITEMS)).await
}

/// GET /api/items/GetLatest/{n}
pub async fn get_latest(
    State(state): State<Arc<AppState>>,
    Path(n): Path<i64>,
) -> ItemListResult {
    let items = state.items.latest(n.min(MAX_NUMBER_OF_ITEMS)).await?;
    Ok(to_view_list(items))
}

/// GET /api/items/GetMostViewed
pub async fn get_most_viewed_default(state: State<Arc<AppState>>) -> ItemListResult {
    get_most_viewed(state, Path(DEFAULT_NUMBER_OF_ITEMS)).await
}

/// GET /api/items/GetMostViewed/{n}
pub async fn get_most_viewed(
    State(state): State<Arc<AppState>>,
    Path(n): Path<i64>,
) -> ItemListResult {
    let items = state.items.most_viewed(n.min(MAX_NUMBER_OF_ITEMS)).await?;
    Ok(to_view_list(items))
}

/// GET /api/items/GetRandom
pub async fn get_random_default(state: State<Arc<AppState>>) -> ItemListResult {
    get_random(state, Path(DEFAULT_NUMBER_OF_ITEMS)).await
}

/// GET /api/items/GetRandom/{n}
pub async fn get_random(
    State(state): State<Arc<AppState>>,
    Path(n): Path<i64>,
) -> ItemListResult {
    let items = state.items.random(n.min(MAX_NUMBER_OF_ITEMS)).await?;
    Ok(to_view_list(items))
}
