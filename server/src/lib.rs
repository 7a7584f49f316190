//! HTTP API surface for the Tideline activity-stream engine.
//!
//! Handlers are stateless compositions of the reference resolver, the
//! action/follow store, the stream query engine, and the projector; the
//! router is built once from an immutable [`AppState`].

use axum::routing::{any, get, post};
use axum::Router;

mod error;
mod handlers;
mod seed;
mod state;

pub use error::ApiError;
pub use seed::{build_state, CollectionSeed, EntitySeed, RenderConfig, RenderMode, Seed, SessionSeed};
pub use state::{AppState, Sessions};

/// Build the HTTP API router with the given application state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(handlers::api_root))
        .route("/api/actions/", get(handlers::actions_list))
        .route("/api/actions/me/", get(handlers::actions_me))
        .route("/api/actions/send/", post(handlers::actions_send))
        .route("/api/actions/model/{type_id}/", get(handlers::actions_model))
        .route(
            "/api/actions/object/{type_id}/{object_id}/",
            get(handlers::actions_object),
        )
        .route("/api/actions/{id}/", get(handlers::action_detail))
        .route("/api/follows/", get(handlers::follows_list))
        .route("/api/follows/follow/", post(handlers::follow_create))
        .route("/api/follows/unfollow/", post(handlers::follow_delete))
        .route("/api/follows/{id}/", get(handlers::follow_detail))
        .route("/api/{collection}/", get(handlers::collection_list))
        .route("/api/{collection}/{id}/", any(handlers::collection_member))
        .with_state(state)
}
