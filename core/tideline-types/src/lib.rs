//! Core type definitions for Tideline.
//!
//! This crate defines the fundamental, domain-agnostic types used throughout
//! the activity-stream engine:
//! - Type and record identifiers ([`TypeId`], [`ActionId`], [`FollowId`])
//! - [`EntityRef`] — the polymorphic, type-erased reference to any registered entity
//! - [`Action`] — an immutable activity-log entry
//! - [`Follow`] — a directed subscription between two entities
//! - Naive timestamp formatting shared by the store and the API surface
//!
//! Application-specific entity shapes (users, groups, whatever a deployment
//! registers) never appear here; they are reached only through [`EntityRef`].

mod action;
mod follow;
mod ids;
mod refs;
mod timestamp;

pub use action::{Action, NewAction};
pub use follow::Follow;
pub use ids::{ActionId, FollowId, TypeId};
pub use refs::EntityRef;
pub use timestamp::{format_timestamp, parse_timestamp, STORE_TIMESTAMP_FORMAT};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
