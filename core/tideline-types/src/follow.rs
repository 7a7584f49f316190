//! Follow records — directed subscriptions between entities.

use crate::{EntityRef, FollowId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A directed subscription from a follower entity to a followed entity.
///
/// At most one follow exists per `(follower, followed)` pair; the store's
/// uniqueness constraint is the source of truth for that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follow {
    /// Store-assigned identifier.
    pub id: FollowId,

    /// The subscribing entity (a user-capable entity).
    pub follower: EntityRef,

    /// The entity whose activity is subscribed to. May be any entity.
    pub followed: EntityRef,

    /// When true, only actions where the followed entity is the actor are
    /// included in the follower's aggregated stream.
    pub actor_only: bool,

    /// When the subscription started.
    pub started: NaiveDateTime,
}
