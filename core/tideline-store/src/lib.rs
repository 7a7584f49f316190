//! SQLite-backed action/follow store and stream query engine for Tideline.
//!
//! # Architecture
//!
//! - Actions are an append-only log: created once, never updated
//! - The `(follower, followed)` pair-uniqueness invariant lives in the
//!   database as a `UNIQUE` index; violating it maps to a `Conflict` error,
//!   so concurrent duplicate follows get exactly one winner
//! - Stream queries are pure reads: one SQL query per selector, ordered
//!   `timestamp DESC, id DESC`, with the visibility predicate appended
//!   uniformly and pagination bounding every materialization
//! - References that fail to resolve at read time are skipped per item,
//!   never surfaced as a query failure

mod error;
mod store;
mod streams;

pub use error::{StoreError, StoreResult};
pub use store::StreamStore;
pub use streams::{Page, Viewer};

/// Returns true when the action is visible to the given viewer: every public
/// action is, a private one only to its participants.
#[must_use]
pub fn visible_to(action: &tideline_types::Action, viewer: &Viewer) -> bool {
    if action.public {
        return true;
    }
    match viewer {
        Viewer::Anonymous => false,
        Viewer::User(user) => action.involves(user),
    }
}
