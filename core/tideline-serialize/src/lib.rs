//! Serialization layer for Tideline API responses.
//!
//! Two registries meet here:
//! - the field-spec registry declares which attributes of each entity class
//!   are exposed in responses (registered by application startup code, closed
//!   thereafter, and required to cover exactly the classes the reference
//!   resolver knows)
//! - a deployment-wide reference render strategy decides how reference fields
//!   (actor/target/action-object/follower/followed) appear: as absolute
//!   hyperlinks, as nested expanded objects, or as raw `(type_id, object_id)`
//!   pairs. The strategy is chosen once at configuration time and injected;
//!   modes never mix within one deployment.

mod projector;
mod render;
mod spec;

pub use projector::Projector;
pub use render::{ExpandRender, HyperlinkRender, PlainRender, RefRender, RenderCtx};
pub use spec::{FieldSpec, SpecRegistry, SpecRegistryBuilder};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, SerializeError>;

/// Errors that can occur when configuring or running serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// The field-spec registry does not cover exactly the registered
    /// entity classes.
    #[error("field specs do not match registered entity classes: {0}")]
    SpecMismatch(String),

    /// A field spec was registered twice for the same type.
    #[error("duplicate field spec for type {0}")]
    DuplicateSpec(tideline_types::TypeId),
}
