//! Per-entity-class field projection rules.

use crate::{Result, SerializeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tideline_types::TypeId;

/// Declares which attributes of an entity class are exposed in API
/// responses. Fields name top-level keys of the entity's JSON payload;
/// `id` is always included in projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub fields: Vec<String>,
}

impl FieldSpec {
    #[must_use]
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Builder for [`SpecRegistry`]; one registration per entity class,
/// performed by application code at startup.
#[derive(Default)]
pub struct SpecRegistryBuilder {
    specs: HashMap<TypeId, FieldSpec>,
}

impl SpecRegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the field spec for an entity class.
    pub fn register(mut self, type_id: TypeId, spec: FieldSpec) -> Result<Self> {
        if self.specs.insert(type_id, spec).is_some() {
            return Err(SerializeError::DuplicateSpec(type_id));
        }
        Ok(self)
    }

    /// Finalizes the registry; closed to further registration.
    #[must_use]
    pub fn build(self) -> SpecRegistry {
        SpecRegistry { specs: self.specs }
    }
}

/// Immutable mapping from entity classes to their field specs.
pub struct SpecRegistry {
    specs: HashMap<TypeId, FieldSpec>,
}

impl SpecRegistry {
    /// The field spec registered for a type, if any.
    #[must_use]
    pub fn lookup(&self, type_id: TypeId) -> Option<&FieldSpec> {
        self.specs.get(&type_id)
    }

    /// The full key set of the registry.
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.specs.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
