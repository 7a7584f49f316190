//! Projection of store records and entities into API response bodies.

use crate::render::{RefRender, RenderCtx};
use crate::spec::SpecRegistry;
use crate::{Result, SerializeError};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tideline_registry::{Entity, Registry};
use tideline_types::{Action, Follow};

/// Shapes API responses: entity field projection plus reference rendering
/// through the deployment's single configured strategy.
pub struct Projector {
    registry: Arc<Registry>,
    specs: SpecRegistry,
    style: Arc<dyn RefRender>,
}

impl Projector {
    /// Builds a projector.
    ///
    /// Fails unless the field-spec registry's key set equals exactly the set
    /// of classes registered with the resolver — specs are not
    /// runtime-discoverable beyond explicit registration calls.
    pub fn new(
        registry: Arc<Registry>,
        specs: SpecRegistry,
        style: Arc<dyn RefRender>,
    ) -> Result<Self> {
        let registered: BTreeSet<_> = registry
            .collections()
            .filter_map(|name| registry.type_id(name))
            .collect();
        let specced: BTreeSet<_> = specs.type_ids().collect();
        if registered != specced {
            return Err(SerializeError::SpecMismatch(format!(
                "resolver knows {registered:?}, field specs cover {specced:?}"
            )));
        }
        Ok(Self {
            registry,
            specs,
            style,
        })
    }

    fn ctx(&self) -> RenderCtx<'_> {
        RenderCtx {
            registry: &self.registry,
            specs: &self.specs,
        }
    }

    /// Projects an entity through its registered field spec.
    #[must_use]
    pub fn project_entity(&self, entity: &Entity) -> Value {
        project_entity_fields(entity, &self.specs)
    }

    /// Projects an action, rendering its reference fields through the
    /// configured strategy. Timestamps serialize ISO-8601 without a timezone
    /// suffix.
    #[must_use]
    pub fn project_action(&self, action: &Action) -> Value {
        let ctx = self.ctx();
        json!({
            "id": action.id,
            "actor": self.style.render(&action.actor, &ctx),
            "verb": action.verb,
            "action_object": action
                .action_object
                .as_ref()
                .map_or(Value::Null, |r| self.style.render(r, &ctx)),
            "target": action
                .target
                .as_ref()
                .map_or(Value::Null, |r| self.style.render(r, &ctx)),
            "timestamp": action.timestamp,
            "description": action.description,
            "public": action.public,
            "data": action.data,
        })
    }

    /// Projects a follow, rendering both endpoints through the configured
    /// strategy.
    #[must_use]
    pub fn project_follow(&self, follow: &Follow) -> Value {
        let ctx = self.ctx();
        json!({
            "id": follow.id,
            "follower": self.style.render(&follow.follower, &ctx),
            "followed": self.style.render(&follow.followed, &ctx),
            "actor_only": follow.actor_only,
            "started": follow.started,
        })
    }
}

/// Projects an entity's payload down to its registered fields, always
/// including `id`. Without a registered spec the payload is omitted entirely
/// and only the identity remains.
pub(crate) fn project_entity_fields(entity: &Entity, specs: &SpecRegistry) -> Value {
    let mut out = Map::new();
    out.insert("id".to_string(), Value::String(entity.object_id.clone()));
    if let Some(spec) = specs.lookup(entity.type_id) {
        for field in &spec.fields {
            let value = entity.data.get(field).cloned().unwrap_or(Value::Null);
            out.insert(field.clone(), value);
        }
    }
    Value::Object(out)
}
