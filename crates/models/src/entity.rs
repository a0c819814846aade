//! Traits shared by every record a document store can hold.

use std::fmt::Display;
use std::hash::Hash;

use mongodb::bson::oid::ObjectId;
use serde::{de::DeserializeOwned, Serialize};

/// Identifier type a store can mint for a record saved without one.
pub trait EntityId:
    Clone + Eq + Hash + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn generate() -> Self;
}

/// String ids are minted as MongoDB ObjectIds in their 24-char hex form, so
/// every backend hands out ids that look the same.
impl EntityId for String {
    fn generate() -> Self {
        ObjectId::new().to_hex()
    }
}

/// A document persisted in a named collection and keyed by an optional id.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Id: EntityId;

    /// Collection (or file) the records live in.
    const COLLECTION: &'static str;

    fn id(&self) -> Option<&Self::Id>;

    fn set_id(&mut self, id: Self::Id);
}
