//! Stateless request handlers composing the registry, store, streams, and
//! projector into the HTTP surface.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tideline_store::{visible_to, Page, Viewer};
use tideline_types::{EntityRef, NewAction, TypeId};

// ── Auth & pagination helpers ────────────────────────────────────

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The current user, required. Fails with 401 when the request carries no
/// valid session token.
fn current_user(state: &AppState, headers: &HeaderMap) -> Result<EntityRef, ApiError> {
    bearer_token(headers)
        .and_then(|token| state.sessions.get(token).cloned())
        .ok_or_else(|| ApiError::PermissionDenied("authentication required".into()))
}

/// The viewer for endpoints that serve both anonymous and authenticated
/// readers: an invalid or absent token degrades to anonymous.
fn viewer(state: &AppState, headers: &HeaderMap) -> Viewer {
    match bearer_token(headers).and_then(|token| state.sessions.get(token).cloned()) {
        Some(user) => Viewer::User(user),
        None => Viewer::Anonymous,
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    limit: Option<usize>,
    offset: Option<usize>,
}

fn page(state: &AppState, params: &PageParams) -> Page {
    Page::new(
        params.limit.unwrap_or(state.page_limit),
        params.offset.unwrap_or(0),
    )
}

// ── Discovery ────────────────────────────────────────────────────

/// Enumerates exactly the registered collection names (the entity classes
/// plus the two built-in collections), mapping each to its list endpoint.
pub async fn api_root(State(state): State<AppState>) -> Json<Value> {
    let mut out = serde_json::Map::new();
    out.insert("actions".into(), Value::String("/api/actions/".into()));
    out.insert("follows".into(), Value::String("/api/follows/".into()));
    for name in state.registry.collections() {
        out.insert(name.to_string(), Value::String(format!("/api/{name}/")));
    }
    Json(Value::Object(out))
}

// ── Action feeds ─────────────────────────────────────────────────

/// Global public feed; no authentication required.
pub async fn actions_list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let actions = state.store.public_stream(page(&state, &params))?;
    let body = actions
        .iter()
        .map(|a| state.projector.project_action(a))
        .collect();
    Ok(Json(Value::Array(body)))
}

/// Action detail, visibility-checked against the (possibly anonymous) viewer.
pub async fn action_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let action = state
        .store
        .get_action(tideline_types::ActionId::from_i64(id))?;
    if !visible_to(&action, &viewer(&state, &headers)) {
        return Err(ApiError::NotFound(format!("action {id}")));
    }
    Ok(Json(state.projector.project_action(&action)))
}

/// The authenticated user's aggregated feed.
pub async fn actions_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&state, &headers)?;
    let actions = state.store.user_stream(&user, page(&state, &params))?;
    let body = actions
        .iter()
        .map(|a| state.projector.project_action(a))
        .collect();
    Ok(Json(Value::Array(body)))
}

/// Actions involving any entity of the given type.
pub async fn actions_model(
    State(state): State<AppState>,
    Path(type_id): Path<u32>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&state, &headers)?;
    let type_id = TypeId::from_u32(type_id);
    if !state.registry.contains(type_id) {
        return Err(ApiError::NotFound(format!("unknown entity type: {type_id}")));
    }
    let actions = state
        .store
        .model_stream(type_id, &Viewer::User(user), page(&state, &params))?;
    let body = actions
        .iter()
        .map(|a| state.projector.project_action(a))
        .collect();
    Ok(Json(Value::Array(body)))
}

/// Actions involving one specific object, in any role.
pub async fn actions_object(
    State(state): State<AppState>,
    Path((type_id, object_id)): Path<(u32, String)>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&state, &headers)?;
    let type_id = TypeId::from_u32(type_id);
    if !state.registry.contains(type_id) {
        return Err(ApiError::NotFound(format!("unknown entity type: {type_id}")));
    }
    let entity = EntityRef::new(type_id, object_id);
    let actions = state
        .store
        .any_stream(&entity, &Viewer::User(user), page(&state, &params))?;
    let body = actions
        .iter()
        .map(|a| state.projector.project_action(a))
        .collect();
    Ok(Json(Value::Array(body)))
}

// ── Sending actions ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendBody {
    verb: String,
    target_content_type_id: Option<u32>,
    target_object_id: Option<String>,
    action_object_content_type_id: Option<u32>,
    action_object_object_id: Option<String>,
    description: Option<String>,
    public: Option<bool>,
    data: Option<Value>,
}

fn ref_from_pair(
    field: &str,
    type_id: Option<u32>,
    object_id: Option<String>,
) -> Result<Option<EntityRef>, ApiError> {
    match (type_id, object_id) {
        (Some(t), Some(id)) => Ok(Some(EntityRef::new(TypeId::from_u32(t), id))),
        (None, None) => Ok(None),
        _ => Err(ApiError::Validation(format!(
            "{field} requires both a content type id and an object id"
        ))),
    }
}

/// Records an action with the current user as actor. 201 on success.
pub async fn actions_send(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SendBody>,
) -> Result<Response, ApiError> {
    let user = current_user(&state, &headers)?;
    let target = ref_from_pair("target", body.target_content_type_id, body.target_object_id)?;
    let object = ref_from_pair(
        "action_object",
        body.action_object_content_type_id,
        body.action_object_object_id,
    )?;

    let mut new = NewAction::new(user, body.verb);
    if let Some(target) = target {
        new = new.target(target);
    }
    if let Some(object) = object {
        new = new.action_object(object);
    }
    if let Some(description) = body.description {
        new = new.description(description);
    }
    if body.public == Some(false) {
        new = new.private();
    }
    if let Some(data) = body.data {
        new = new.data(data);
    }

    let action = state.store.create_action(new)?;
    let body = state.projector.project_action(&action);
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

// ── Follows ──────────────────────────────────────────────────────

pub async fn follows_list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let follows = state.store.list_follows(page(&state, &params))?;
    let body = follows
        .iter()
        .map(|f| state.projector.project_follow(f))
        .collect();
    Ok(Json(Value::Array(body)))
}

pub async fn follow_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let follow = state
        .store
        .get_follow(tideline_types::FollowId::from_i64(id))?;
    Ok(Json(state.projector.project_follow(&follow)))
}

#[derive(Debug, Deserialize)]
pub struct FollowBody {
    content_type_id: u32,
    object_id: String,
    #[serde(default)]
    actor_only: bool,
}

/// Subscribes the current user to an entity. 201 on success, 409 when the
/// pair already exists.
pub async fn follow_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<FollowBody>,
) -> Result<Response, ApiError> {
    let user = current_user(&state, &headers)?;
    let followed = EntityRef::new(TypeId::from_u32(body.content_type_id), body.object_id);
    let follow = state.store.create_follow(user, followed, body.actor_only)?;
    let body = state.projector.project_follow(&follow);
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct UnfollowBody {
    content_type_id: u32,
    object_id: String,
}

/// Removes the current user's subscription. 404 when no such pair exists;
/// callers wanting idempotent semantics must check first.
pub async fn follow_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UnfollowBody>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&state, &headers)?;
    let followed = EntityRef::new(TypeId::from_u32(body.content_type_id), body.object_id);
    state.store.delete_follow(&user, &followed)?;
    Ok(Json(json!({ "detail": "unfollowed" })))
}

// ── Entity collections ───────────────────────────────────────────

pub async fn collection_list(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let type_id = state
        .registry
        .type_id(&collection)
        .ok_or_else(|| ApiError::NotFound(format!("unknown collection: {collection}")))?;
    let entities = state.registry.list(type_id)?;
    let body = entities
        .iter()
        .map(|e| state.projector.project_entity(e))
        .collect();
    Ok(Json(Value::Array(body)))
}

/// Detail (GET) and existence probe (HEAD) for one entity.
///
/// A registered entity class may substitute its own probe response; without
/// an override the probe answers 200 when the object exists, 404 otherwise.
pub async fn collection_member(
    State(state): State<AppState>,
    Path((collection, object_id)): Path<(String, String)>,
    method: Method,
) -> Result<Response, ApiError> {
    let type_id = state
        .registry
        .type_id(&collection)
        .ok_or_else(|| ApiError::NotFound(format!("unknown collection: {collection}")))?;
    let entity_ref = EntityRef::new(type_id, object_id.clone());

    match method {
        Method::HEAD => {
            if let Some(probe) = state.registry.probe(type_id, &object_id)? {
                let status =
                    StatusCode::from_u16(probe.status).unwrap_or(StatusCode::OK);
                return Ok((status, Json(probe.body)).into_response());
            }
            if state.registry.resolves(&entity_ref) {
                Ok(StatusCode::OK.into_response())
            } else {
                Ok(StatusCode::NOT_FOUND.into_response())
            }
        }
        Method::GET => {
            let entity = state.registry.resolve(&entity_ref)?;
            Ok(Json(state.projector.project_entity(&entity)).into_response())
        }
        _ => Ok(StatusCode::METHOD_NOT_ALLOWED.into_response()),
    }
}
