//! In-memory entity source, used by seed loading and tests.

use crate::{EntitySource, ProbeResponse};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// A simple in-memory [`EntitySource`].
///
/// Entities can be removed after registration, which is how tests simulate
/// the concurrent-deletion case that produces dangling references.
pub struct MemoryDirectory {
    entities: RwLock<BTreeMap<String, serde_json::Value>>,
    probe_override: Option<ProbeResponse>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            probe_override: None,
        }
    }

    /// Configures a fixed existence-probe response for every object id of
    /// this class.
    #[must_use]
    pub fn with_probe(mut self, probe: ProbeResponse) -> Self {
        self.probe_override = Some(probe);
        self
    }

    /// Inserts or replaces an entity payload.
    pub fn insert(&self, object_id: impl Into<String>, data: serde_json::Value) {
        self.entities
            .write()
            .expect("directory lock poisoned")
            .insert(object_id.into(), data);
    }

    /// Removes an entity, leaving any stored references to it dangling.
    pub fn remove(&self, object_id: &str) -> bool {
        self.entities
            .write()
            .expect("directory lock poisoned")
            .remove(object_id)
            .is_some()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.read().expect("directory lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl EntitySource for MemoryDirectory {
    fn get(&self, object_id: &str) -> Option<serde_json::Value> {
        self.entities
            .read()
            .expect("directory lock poisoned")
            .get(object_id)
            .cloned()
    }

    fn list(&self) -> Vec<(String, serde_json::Value)> {
        self.entities
            .read()
            .expect("directory lock poisoned")
            .iter()
            .map(|(id, data)| (id.clone(), data.clone()))
            .collect()
    }

    fn probe(&self, _object_id: &str) -> Option<ProbeResponse> {
        self.probe_override.clone()
    }
}
