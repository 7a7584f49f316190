//! Shared application state for the HTTP surface.

use std::collections::HashMap;
use std::sync::Arc;
use tideline_registry::Registry;
use tideline_serialize::Projector;
use tideline_store::StreamStore;
use tideline_types::EntityRef;

/// Bearer-token to user mapping supplied by the deployment at startup.
///
/// Stands in for the authentication collaborator: the core only needs a
/// "current user" identity for the auth-required operations.
pub type Sessions = HashMap<String, EntityRef>;

/// State shared by all handlers. Everything is `Arc`-shared and immutable (or
/// internally synchronized, for the store), so no handler holds per-request
/// mutable shared state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub store: Arc<StreamStore>,
    pub projector: Arc<Projector>,
    pub sessions: Arc<Sessions>,
    /// Default page size when a request does not pass `?limit=`.
    pub page_limit: usize,
}
