//! Generic persistence port.
//!
//! A repository is bound to one entity type and its identifier type and
//! exposes nothing beyond listing and saving whole documents.

pub mod mongo;

use async_trait::async_trait;
use models::{Entity, EntityId};

use crate::errors::ServiceError;

#[async_trait]
pub trait Repository<T, ID>: Send + Sync
where
    T: Entity<Id = ID>,
    ID: EntityId,
{
    /// Every stored document, in whatever order the store yields them.
    async fn find_all(&self) -> Result<Vec<T>, ServiceError>;

    /// Insert or fully replace a document and return what was stored.
    ///
    /// A document without an id is given a freshly generated one. A document
    /// with an id replaces any existing document with that id.
    async fn save(&self, entity: T) -> Result<T, ServiceError>;
}
