//! Shared fixture: three entity classes, eleven actions, six follows.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::json;
use std::sync::Arc;
use tideline_registry::{MemoryDirectory, Registry, RegistryBuilder};
use tideline_store::StreamStore;
use tideline_types::{EntityRef, NewAction};

pub struct Fixture {
    pub registry: Arc<Registry>,
    pub store: StreamStore,
    pub users: Arc<MemoryDirectory>,
    pub groups: Arc<MemoryDirectory>,
    pub comments: Arc<MemoryDirectory>,
}

impl Fixture {
    pub fn user(&self, id: &str) -> EntityRef {
        self.registry.entity_ref("users", id).unwrap()
    }

    pub fn group(&self, id: &str) -> EntityRef {
        self.registry.entity_ref("groups", id).unwrap()
    }

    pub fn comment(&self, id: &str) -> EntityRef {
        self.registry.entity_ref("comments", id).unwrap()
    }
}

pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Timestamp of the nth fixture action (1-based).
pub fn minute(n: i64) -> NaiveDateTime {
    base_time() + Duration::minutes(n - 1)
}

/// Registry with entities but no recorded activity.
pub fn empty_fixture() -> Fixture {
    let users = Arc::new(MemoryDirectory::new());
    users.insert("1", json!({"username": "admin"}));
    users.insert("2", json!({"username": "Two"}));
    users.insert("3", json!({"username": "Three"}));
    users.insert("4", json!({"username": "Four"}));

    let groups = Arc::new(MemoryDirectory::new());
    groups.insert("1", json!({"name": "CoolGroup"}));
    groups.insert("2", json!({"name": "NiceGroup"}));

    let comments = Arc::new(MemoryDirectory::new());
    comments.insert("1", json!({"comment": "great article!"}));

    let registry = Arc::new(
        RegistryBuilder::new()
            .register("users", users.clone())
            .register("groups", groups.clone())
            .register("comments", comments.clone())
            .build()
            .unwrap(),
    );
    let store = StreamStore::open_in_memory(registry.clone()).unwrap();

    Fixture {
        registry,
        store,
        users,
        groups,
        comments,
    }
}

/// The full canonical fixture: 11 actions and 6 follows.
pub fn seeded_fixture() -> Fixture {
    let fx = empty_fixture();
    let (user, group, comment) = (
        |id| fx.user(id),
        |id| fx.group(id),
        |id| fx.comment(id),
    );
    let cool = group("1");
    let nice = group("2");

    let actions = [
        NewAction::new(user("2"), "joined").target(cool.clone()),
        NewAction::new(user("3"), "liked"),
        NewAction::new(user("4"), "joined").target(cool.clone()),
        NewAction::new(user("3"), "commented on")
            .action_object(comment("1"))
            .target(cool.clone()),
        NewAction::new(cool.clone(), "responded to").target(comment("1")),
        NewAction::new(user("4"), "started following").target(user("3")),
        NewAction::new(user("1"), "commented on").target(nice.clone()),
        NewAction::new(user("3"), "joined").target(nice.clone()),
        NewAction::new(user("4"), "liked").action_object(comment("1")),
        NewAction::new(user("3"), "shared").target(comment("1")),
        NewAction::new(user("1"), "joined").target(cool.clone()),
    ];
    for (i, new) in actions.into_iter().enumerate() {
        fx.store
            .create_action(new.timestamp(minute(i as i64 + 1)))
            .unwrap();
    }

    let follows = [
        (user("1"), user("2"), true),
        (user("2"), cool.clone(), false),
        (user("3"), cool, false),
        (user("4"), user("1"), true),
        (user("4"), nice, false),
        (user("3"), user("4"), true),
    ];
    for (follower, followed, actor_only) in follows {
        fx.store.create_follow(follower, followed, actor_only).unwrap();
    }

    fx
}
