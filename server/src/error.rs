//! Client-visible error taxonomy and HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tideline_registry::RegistryError;
use tideline_store::StoreError;

/// Errors surfaced by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid required field on creation. 400.
    #[error("{0}")]
    Validation(String),

    /// Unauthenticated access to an auth-required endpoint. 401.
    #[error("{0}")]
    PermissionDenied(String),

    /// The requested record or collection does not exist. 404.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate follow pair. 409.
    #[error("{0}")]
    Conflict(String),

    /// Anything the client cannot act on. 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PermissionDenied(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(entity_ref) => {
                ApiError::NotFound(format!("entity not found: {entity_ref}"))
            }
            RegistryError::UnknownType(type_id) => {
                ApiError::NotFound(format!("unknown entity type: {type_id}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
