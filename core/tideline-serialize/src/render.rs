//! Reference render strategies.

use crate::spec::SpecRegistry;
use serde_json::{json, Value};
use tideline_registry::Registry;
use tideline_types::EntityRef;

/// Everything a strategy may consult while rendering a reference.
pub struct RenderCtx<'a> {
    pub registry: &'a Registry,
    pub specs: &'a SpecRegistry,
}

/// Deployment-wide strategy for rendering reference fields.
///
/// Chosen once at configuration time and injected into the projector; the
/// serialization path never branches on a mode per call.
pub trait RefRender: Send + Sync {
    fn render(&self, entity_ref: &EntityRef, ctx: &RenderCtx<'_>) -> Value;
}

/// Renders a reference as the raw `(type_id, object_id)` pair. The default
/// when no mode is configured.
pub struct PlainRender;

impl RefRender for PlainRender {
    fn render(&self, entity_ref: &EntityRef, _ctx: &RenderCtx<'_>) -> Value {
        plain_pair(entity_ref)
    }
}

/// Renders a reference as an absolute URL to the referenced entity's detail
/// endpoint.
pub struct HyperlinkRender {
    base_url: String,
}

impl HyperlinkRender {
    /// `base_url` is the deployment's external address, without a trailing
    /// slash (e.g. `https://example.org`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

impl RefRender for HyperlinkRender {
    fn render(&self, entity_ref: &EntityRef, ctx: &RenderCtx<'_>) -> Value {
        match ctx.registry.name(entity_ref.type_id) {
            Some(collection) => Value::String(format!(
                "{}/api/{}/{}/",
                self.base_url, collection, entity_ref.object_id
            )),
            // Unregistered type: nothing to link to, fall back to the pair.
            None => plain_pair(entity_ref),
        }
    }
}

/// Renders a reference as a nested object carrying the referenced entity's
/// registered fields. A dangling reference renders as `null`.
pub struct ExpandRender;

impl RefRender for ExpandRender {
    fn render(&self, entity_ref: &EntityRef, ctx: &RenderCtx<'_>) -> Value {
        match ctx.registry.resolve(entity_ref) {
            Ok(entity) => crate::projector::project_entity_fields(&entity, ctx.specs),
            Err(_) => Value::Null,
        }
    }
}

fn plain_pair(entity_ref: &EntityRef) -> Value {
    json!({
        "type_id": entity_ref.type_id,
        "object_id": entity_ref.object_id,
    })
}
