//! Action records — the immutable entries of the activity log.

use crate::{ActionId, EntityRef};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An immutable record of an actor performing a verb, optionally on an
/// action-object, toward a target, at a point in time.
///
/// Actions are created exactly once via the store's send operation and never
/// mutated afterwards; deletion is an out-of-core retention concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Store-assigned identifier, strictly increasing.
    pub id: ActionId,

    /// The entity that performed the verb. Required and resolvable at creation.
    pub actor: EntityRef,

    /// What the actor did. Non-empty.
    pub verb: String,

    /// The object the verb was performed on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_object: Option<EntityRef>,

    /// The entity the action was directed toward, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<EntityRef>,

    /// When the action happened. Defaults to creation time, immutable after.
    pub timestamp: NaiveDateTime,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the action is visible to everyone or only to its participants.
    pub public: bool,

    /// Optional structured payload attached by the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Action {
    /// Iterates over the references participating in this action
    /// (actor, then target, then action-object when present).
    pub fn participants(&self) -> impl Iterator<Item = &EntityRef> {
        std::iter::once(&self.actor)
            .chain(self.target.iter())
            .chain(self.action_object.iter())
    }

    /// Returns true if the given entity is a participant of this action.
    #[must_use]
    pub fn involves(&self, entity: &EntityRef) -> bool {
        self.participants().any(|r| r == entity)
    }
}

/// Input for creating an action. The store assigns the id and, unless one is
/// supplied, the timestamp.
#[derive(Debug, Clone)]
pub struct NewAction {
    pub actor: EntityRef,
    pub verb: String,
    pub action_object: Option<EntityRef>,
    pub target: Option<EntityRef>,
    pub timestamp: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub public: bool,
    pub data: Option<serde_json::Value>,
}

impl NewAction {
    /// Starts a new action for the given actor and verb. Public by default.
    #[must_use]
    pub fn new(actor: EntityRef, verb: impl Into<String>) -> Self {
        Self {
            actor,
            verb: verb.into(),
            action_object: None,
            target: None,
            timestamp: None,
            description: None,
            public: true,
            data: None,
        }
    }

    /// Sets the target.
    #[must_use]
    pub fn target(mut self, target: EntityRef) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the action-object.
    #[must_use]
    pub fn action_object(mut self, object: EntityRef) -> Self {
        self.action_object = Some(object);
        self
    }

    /// Sets an explicit timestamp instead of the creation time.
    #[must_use]
    pub fn timestamp(mut self, ts: NaiveDateTime) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the action as participant-only.
    #[must_use]
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Attaches a structured payload.
    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
