//! Storage contract shared by the catalog repositories

use async_trait::async_trait;
use crate::domain::{Entity, DomainResult};

/// CRUD over one entity type.
///
/// Each call locks the shared connection for its own duration only.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert, returning the row with its assigned id
    async fn create(&self, entity: &T) -> DomainResult<T>;

    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// Persist the client-editable fields; `NotFound` if the row is gone
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete by id, along with anything the row owns
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}
