//! Item Repository Module
//!
//! - item_repo: Core CRUD operations
//! - item_ranking: Ranked listings (latest, most viewed, random)

mod item_repo;
mod item_ranking;

pub use item_repo::ItemRepository;
pub use item_ranking::ItemRankingOperations;

pub(crate) use item_repo::item_exists;
