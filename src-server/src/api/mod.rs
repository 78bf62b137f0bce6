//! API Layer
//!
//! axum handlers bridging HTTP to the repositories.

mod error;
mod json;
mod identity;
mod view_model;
mod item_api;
mod comment_api;

pub use error::ApiError;
pub use json::PrettyJson;
pub use identity::CurrentUser;
pub use view_model::{CommentThreadViewModel, CommentViewModel, ItemViewModel};
pub use item_api::*;
pub use comment_api::*;
