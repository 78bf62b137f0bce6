//! Repository Layer
//!
//! Data access abstractions and implementations. Every call returns fully
//! materialized rows; related records are fetched explicitly.

mod traits;
mod db;
mod item;
mod comment_repo;
mod user_repo;
mod seed;


pub use traits::Repository;
pub use db::{init_db, DbState};
pub use item::{ItemRepository, ItemRankingOperations};
pub use comment_repo::CommentRepository;
pub use user_repo::UserRepository;
pub use seed::seed_sample_items;
