//! The process-wide entity class registry.

use crate::{Entity, EntitySource, RegistryError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tideline_types::{EntityRef, TypeId};

struct Registration {
    name: String,
    source: Arc<dyn EntitySource>,
}

/// Builder for [`Registry`]. Register every entity class that may appear as
/// actor, target, action-object, follower, or followed, then `build`.
#[derive(Default)]
pub struct RegistryBuilder {
    registrations: Vec<Registration>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity class under a collection name. The assigned type
    /// id is determined by registration order, starting at 1.
    pub fn register(mut self, name: impl Into<String>, source: Arc<dyn EntitySource>) -> Self {
        self.registrations.push(Registration {
            name: name.into(),
            source,
        });
        self
    }

    /// Finalizes the registry. Fails when a collection name was registered
    /// more than once.
    pub fn build(self) -> Result<Registry> {
        let mut by_name = HashMap::new();
        for (idx, reg) in self.registrations.iter().enumerate() {
            let type_id = TypeId::from_u32(idx as u32 + 1);
            if by_name.insert(reg.name.clone(), type_id).is_some() {
                return Err(RegistryError::DuplicateName(reg.name.clone()));
            }
        }
        Ok(Registry {
            registrations: self.registrations,
            by_name,
        })
    }
}

/// Immutable mapping from entity classes to type identifiers and resolver
/// capabilities. Built once at startup; shared via `Arc`; requires no
/// synchronization for concurrent lookups.
pub struct Registry {
    registrations: Vec<Registration>,
    by_name: HashMap<String, TypeId>,
}

impl Registry {
    fn registration(&self, type_id: TypeId) -> Option<&Registration> {
        let idx = type_id.as_u32().checked_sub(1)? as usize;
        self.registrations.get(idx)
    }

    /// Returns the type id registered under the given collection name.
    #[must_use]
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Returns the collection name of a type id.
    #[must_use]
    pub fn name(&self, type_id: TypeId) -> Option<&str> {
        self.registration(type_id).map(|r| r.name.as_str())
    }

    /// Returns true when the type id belongs to a registered class.
    #[must_use]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.registration(type_id).is_some()
    }

    /// Collection names in registration order.
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(|r| r.name.as_str())
    }

    /// Builds a reference into the named collection, if it is registered.
    /// The object is not required to exist; references are weak.
    #[must_use]
    pub fn entity_ref(&self, name: &str, object_id: impl Into<String>) -> Option<EntityRef> {
        self.type_id(name).map(|t| EntityRef::new(t, object_id))
    }

    /// Resolves a reference to its entity.
    ///
    /// Fails with [`RegistryError::NotFound`] when the object no longer
    /// exists. Callers iterating over collections must isolate this failure
    /// per item rather than aborting the whole operation.
    pub fn resolve(&self, entity_ref: &EntityRef) -> Result<Entity> {
        let reg = self
            .registration(entity_ref.type_id)
            .ok_or(RegistryError::UnknownType(entity_ref.type_id))?;
        let data = reg
            .source
            .get(&entity_ref.object_id)
            .ok_or_else(|| RegistryError::NotFound(entity_ref.clone()))?;
        Ok(Entity::new(
            entity_ref.type_id,
            entity_ref.object_id.clone(),
            data,
        ))
    }

    /// Returns true when the reference resolves to a live entity.
    #[must_use]
    pub fn resolves(&self, entity_ref: &EntityRef) -> bool {
        self.registration(entity_ref.type_id)
            .is_some_and(|reg| reg.source.get(&entity_ref.object_id).is_some())
    }

    /// Enumerates all entities of a type.
    pub fn list(&self, type_id: TypeId) -> Result<Vec<Entity>> {
        let reg = self
            .registration(type_id)
            .ok_or(RegistryError::UnknownType(type_id))?;
        Ok(reg
            .source
            .list()
            .into_iter()
            .map(|(id, data)| Entity::new(type_id, id, data))
            .collect())
    }

    /// Consults the class's existence-probe override, if it has one.
    pub fn probe(&self, type_id: TypeId, object_id: &str) -> Result<Option<crate::ProbeResponse>> {
        let reg = self
            .registration(type_id)
            .ok_or(RegistryError::UnknownType(type_id))?;
        Ok(reg.source.probe(object_id))
    }
}
