//! Polymorphic entity references.

use crate::TypeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A weak, type-erased reference to any registered entity.
///
/// Stores only the `(type_id, object_id)` pair; it never owns the entity and
/// is resolved lazily through the registry. Equality is by pair value. A ref
/// may dangle when the referenced entity has been deleted — readers tolerate
/// this per item rather than treating it as a structural error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub type_id: TypeId,
    pub object_id: String,
}

impl EntityRef {
    /// Creates a reference from a type id and object id.
    #[must_use]
    pub fn new(type_id: TypeId, object_id: impl Into<String>) -> Self {
        Self {
            type_id,
            object_id: object_id.into(),
        }
    }

    /// Returns true if this reference points at the given pair.
    #[must_use]
    pub fn points_at(&self, type_id: TypeId, object_id: &str) -> bool {
        self.type_id == type_id && self.object_id == object_id
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_id, self.object_id)
    }
}
