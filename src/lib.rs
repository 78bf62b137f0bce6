//! OpenGameList client
//!
//! Typed HTTP access to the catalog server. Every call resolves to data or
//! to a single [`ServiceError`].

pub mod error;
pub mod models;
pub mod services;

pub use error::ServiceError;
pub use models::{Comment, CommentThread, Item};
pub use services::ItemService;
