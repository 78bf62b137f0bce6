//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod entity;
mod item;
mod comment;
mod user;

pub use entity::{Entity, DomainError, DomainResult, timestamp_now};
pub use item::{Item, ItemEdit};
pub use comment::{Comment, CommentThread, build_threads, MAX_REPLY_DEPTH};
pub use user::User;
