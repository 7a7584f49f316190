use serde::{Deserialize, Serialize};
use tideline_types::{EntityRef, TypeId};

/// A resolved entity in type-erased form.
///
/// The `data` field holds arbitrary JSON whose structure belongs to the
/// application; the core never interprets it beyond field projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub object_id: String,
    pub type_id: TypeId,
    pub data: serde_json::Value,
}

impl Entity {
    /// Creates an entity.
    #[must_use]
    pub fn new(type_id: TypeId, object_id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            object_id: object_id.into(),
            type_id,
            data,
        }
    }

    /// Returns the reference pointing at this entity.
    #[must_use]
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.type_id, self.object_id.clone())
    }

    /// Extracts a string value from `data` by top-level key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}
