//! Repository Layer - Core Traits
//!
//! Abstract data-access interfaces over the tracker, entry, and layout
//! stores. Everything is async so the storage boundary can fail fast and
//! surface errors instead of blocking the event loop.

use async_trait::async_trait;

use crate::domain::{DomainResult, Entity};

/// CRUD contract shared by all entity repositories
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert and return the stored entity with its assigned id
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Extension for repositories that support text search (tracker names)
#[async_trait]
pub trait SearchableRepository<T: Entity>: Repository<T> {
    /// Search entities matching a text query
    async fn search(&self, query: &str) -> DomainResult<Vec<T>>;
}
