//! Reference resolver for Tideline.
//!
//! Actions and follows point at entities through `(type_id, object_id)` pairs;
//! this crate provides the process-wide registry that turns those pairs back
//! into data. The set of entity classes is open: application code registers
//! each class once at startup, and polymorphism comes from the registry
//! lookup, never from a closed compile-time union.
//!
//! # Components
//!
//! - [`EntitySource`] — the capability an entity class registers: lookup,
//!   enumeration, and an optional existence-probe override
//! - [`Registry`] / [`RegistryBuilder`] — built once at startup, immutable
//!   after, so concurrent lookups need no synchronization
//! - [`Entity`] — the type-erased resolved form (id, type, JSON payload)
//! - [`MemoryDirectory`] — an in-memory source for seeds and tests

mod entity;
mod memory;
mod registry;
mod source;

pub use entity::Entity;
pub use memory::MemoryDirectory;
pub use registry::{Registry, RegistryBuilder};
pub use source::{EntitySource, ProbeResponse};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur when building or querying the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The reference points at a type id no source was registered for.
    #[error("unknown entity type: {0}")]
    UnknownType(tideline_types::TypeId),

    /// The referenced object no longer exists (dangling reference).
    #[error("entity not found: {0}")]
    NotFound(tideline_types::EntityRef),

    /// A collection name was registered twice.
    #[error("duplicate collection name: {0}")]
    DuplicateName(String),
}
