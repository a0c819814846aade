use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::entity::Entity;

/// Member name document stores reserve for their own key.
pub const STORE_ID_FIELD: &str = "_id";

/// A message board post.
///
/// Only `id` is known to the backend; every other member of the JSON object is
/// kept verbatim in `fields` and round-trips unchanged. A top-level `_id`
/// member belongs to the store and is dropped on the way in, whatever the
/// backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(default)]
            id: Option<String>,
            #[serde(flatten)]
            fields: Map<String, Value>,
        }

        let Wire { id, mut fields } = Wire::deserialize(deserializer)?;
        fields.remove(STORE_ID_FIELD);
        Ok(Message { id, fields })
    }
}

impl Entity for Message {
    type Id = String;

    const COLLECTION: &'static str = "message";

    fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
