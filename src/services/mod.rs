//! Service wrappers over the REST API

mod item;

pub use item::ItemService;
