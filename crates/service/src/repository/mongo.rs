use std::marker::PhantomData;

use async_trait::async_trait;
use futures::TryStreamExt;
use models::errors::ModelError;
use models::message::STORE_ID_FIELD;
use models::{Entity, EntityId};
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::{Collection, Database};
use tracing::debug;

use crate::errors::ServiceError;
use crate::repository::Repository;

const ENTITY_ID_FIELD: &str = "id";

/// MongoDB-backed repository. One collection per entity type, named by
/// [`Entity::COLLECTION`].
pub struct MongoRepository<T> {
    collection: Collection<Document>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> MongoRepository<T> {
    pub fn new(db: &Database) -> Self {
        Self { collection: db.collection::<Document>(T::COLLECTION), _entity: PhantomData }
    }
}

/// Ids that are valid ObjectId hex are stored as native ObjectIds, anything
/// else is stored as given.
fn to_store_id(id: Bson) -> Bson {
    match id {
        Bson::String(s) => match ObjectId::parse_str(&s) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(s),
        },
        other => other,
    }
}

fn from_store_id(id: Bson) -> Bson {
    match id {
        Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
        other => other,
    }
}

/// Map an entity onto the document layout kept in MongoDB: the entity's `id`
/// becomes `_id`, everything else is copied unchanged.
pub(crate) fn to_storage<T: Entity>(entity: &T) -> Result<Document, ServiceError> {
    let mut fields =
        bson::to_document(entity).map_err(|e| ModelError::Serialization(e.to_string()))?;
    let mut out = Document::new();
    if let Some(id) = fields.remove(ENTITY_ID_FIELD) {
        out.insert(STORE_ID_FIELD, to_store_id(id));
    }
    for (key, value) in fields {
        if key != STORE_ID_FIELD {
            out.insert(key, value);
        }
    }
    Ok(out)
}

pub(crate) fn from_storage<T: Entity>(mut stored: Document) -> Result<T, ServiceError> {
    if let Some(id) = stored.remove(STORE_ID_FIELD) {
        stored.insert(ENTITY_ID_FIELD, from_store_id(id));
    }
    let json = Bson::Document(stored).into_relaxed_extjson();
    let entity = serde_json::from_value(json)
        .map_err(|e| ModelError::InvalidDocument(e.to_string()))?;
    Ok(entity)
}

#[async_trait]
impl<T: Entity> Repository<T, T::Id> for MongoRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>, ServiceError> {
        let cursor = self.collection.find(doc! {}).await?;
        let stored: Vec<Document> = cursor.try_collect().await?;
        debug!(collection = T::COLLECTION, count = stored.len(), "find_all");
        stored.into_iter().map(from_storage).collect()
    }

    async fn save(&self, mut entity: T) -> Result<T, ServiceError> {
        let id = match entity.id() {
            Some(id) => id.clone(),
            None => {
                let id = T::Id::generate();
                entity.set_id(id.clone());
                id
            }
        };
        let store_id = to_store_id(
            bson::to_bson(&id).map_err(|e| ModelError::Serialization(e.to_string()))?,
        );
        let document = to_storage(&entity)?;
        let result = self
            .collection
            .replace_one(doc! { "_id": store_id }, document)
            .upsert(true)
            .await?;
        debug!(
            collection = T::COLLECTION,
            %id,
            replaced = result.modified_count,
            inserted = result.upserted_id.is_some(),
            "save"
        );
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Message;
    use serde_json::json;

    use crate::test_support::mongo_test_db;

    #[test]
    fn to_storage_moves_id_to_underscore_id() -> anyhow::Result<()> {
        let m = Message::new().with_id("abc").with_field("content", "hello");
        let stored = to_storage(&m)?;
        assert_eq!(stored.get_str("_id")?, "abc");
        assert_eq!(stored.get_str("content")?, "hello");
        assert!(!stored.contains_key("id"));
        Ok(())
    }

    #[test]
    fn object_id_hex_is_stored_natively() -> anyhow::Result<()> {
        let oid = ObjectId::new();
        let m = Message::new().with_id(oid.to_hex());
        let stored = to_storage(&m)?;
        assert_eq!(stored.get_object_id("_id")?, oid);
        Ok(())
    }

    #[test]
    fn from_storage_renders_object_id_as_hex() -> anyhow::Result<()> {
        let oid = ObjectId::new();
        let stored = doc! { "_id": oid, "sender": "ana", "likes": 3_i64, "tags": ["x"] };
        let m: Message = from_storage(stored)?;
        assert_eq!(m.id.as_deref(), Some(oid.to_hex().as_str()));
        assert_eq!(m.field("sender"), Some(&json!("ana")));
        assert_eq!(m.field("likes"), Some(&json!(3)));
        assert_eq!(m.field("tags"), Some(&json!(["x"])));
        assert!(m.field("_id").is_none());
        Ok(())
    }

    #[test]
    fn storage_mapping_keeps_nested_content() -> anyhow::Result<()> {
        let m: Message = serde_json::from_value(json!({
            "id": "abc",
            "text": "hi",
            "meta": {"pinned": true, "score": 1.5}
        }))?;
        let back: Message = from_storage(to_storage(&m)?)?;
        assert_eq!(back, m);
        Ok(())
    }

    #[test]
    fn from_storage_rejects_non_string_id() {
        let res = from_storage::<Message>(doc! { "_id": 42_i32, "text": "x" });
        assert!(matches!(res, Err(ServiceError::Model(ModelError::InvalidDocument(_)))));
    }

    #[tokio::test]
    async fn mongo_save_and_find_all() -> anyhow::Result<()> {
        let Some(db) = mongo_test_db().await? else { return Ok(()) };
        let repo = MongoRepository::<Message>::new(&db);

        assert!(repo.find_all().await?.is_empty());

        let created = repo.save(Message::new().with_field("content", "hello")).await?;
        let id = created.id.clone().ok_or_else(|| anyhow::anyhow!("id not assigned"))?;
        assert_eq!(id.len(), 24);

        repo.save(Message::new().with_id("abc").with_field("content", "v1")).await?;
        repo.save(Message::new().with_id("abc").with_field("content", "v2")).await?;
        // replace, not merge
        repo.save(Message::new().with_id(id.clone()).with_field("text", "edited")).await?;

        let all = repo.find_all().await?;
        assert_eq!(all.len(), 2);
        let abc = all.iter().find(|m| m.id.as_deref() == Some("abc"));
        assert_eq!(abc.and_then(|m| m.field("content")), Some(&json!("v2")));
        let edited = all.iter().find(|m| m.id.as_deref() == Some(id.as_str()));
        assert_eq!(edited.and_then(|m| m.field("text")), Some(&json!("edited")));
        assert_eq!(edited.and_then(|m| m.field("content")), None);

        db.drop().await?;
        Ok(())
    }
}
