mod common;

use common::{base_time, empty_fixture, seeded_fixture};
use serde_json::json;
use std::sync::Arc;
use tideline_store::{Page, StoreError, StreamStore};
use tideline_types::{ActionId, EntityRef, FollowId, NewAction, TypeId};

// ── Action creation ──────────────────────────────────────────────

#[test]
fn create_action_assigns_sequential_ids() {
    let fx = empty_fixture();
    let first = fx
        .store
        .create_action(NewAction::new(fx.user("1"), "joined"))
        .unwrap();
    let second = fx
        .store
        .create_action(NewAction::new(fx.user("2"), "joined"))
        .unwrap();
    assert_eq!(first.id, ActionId::from_i64(1));
    assert_eq!(second.id, ActionId::from_i64(2));
}

#[test]
fn create_action_persists_every_field() {
    let fx = empty_fixture();
    let created = fx
        .store
        .create_action(
            NewAction::new(fx.user("3"), "commented on")
                .action_object(fx.comment("1"))
                .target(fx.group("1"))
                .timestamp(base_time())
                .description("said something nice")
                .private()
                .data(json!({"channel": "web"})),
        )
        .unwrap();
    let fetched = fx.store.get_action(created.id).unwrap();
    assert_eq!(fetched, created);
    assert!(!fetched.public);
    assert_eq!(fetched.data, Some(json!({"channel": "web"})));
}

#[test]
fn create_action_rejects_blank_verb() {
    let fx = empty_fixture();
    let err = fx
        .store
        .create_action(NewAction::new(fx.user("1"), "   "))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(fx.store.count_actions().unwrap(), 0);
}

#[test]
fn create_action_rejects_unresolvable_actor() {
    let fx = empty_fixture();
    let ghost = EntityRef::new(TypeId::from_u32(1), "999");
    let err = fx
        .store
        .create_action(NewAction::new(ghost, "joined"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn create_action_defaults_timestamp_to_now() {
    let fx = empty_fixture();
    let before = chrono::Utc::now().naive_utc();
    let action = fx
        .store
        .create_action(NewAction::new(fx.user("1"), "joined"))
        .unwrap();
    let after = chrono::Utc::now().naive_utc();
    assert!(action.timestamp >= before && action.timestamp <= after);
}

#[test]
fn get_action_unknown_id_is_not_found() {
    let fx = empty_fixture();
    let err = fx.store.get_action(ActionId::from_i64(42)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

// ── Follows ──────────────────────────────────────────────────────

#[test]
fn create_and_get_follow() {
    let fx = empty_fixture();
    let created = fx
        .store
        .create_follow(fx.user("1"), fx.group("1"), false)
        .unwrap();
    assert_eq!(created.id, FollowId::from_i64(1));
    let fetched = fx.store.get_follow(created.id).unwrap();
    assert_eq!(fetched, created);
    assert!(fx.store.exists_follow(&fx.user("1"), &fx.group("1")).unwrap());
    assert!(!fx.store.exists_follow(&fx.group("1"), &fx.user("1")).unwrap());
}

#[test]
fn duplicate_follow_conflicts() {
    let fx = empty_fixture();
    fx.store
        .create_follow(fx.user("1"), fx.user("2"), false)
        .unwrap();
    let err = fx
        .store
        .create_follow(fx.user("1"), fx.user("2"), true)
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert_eq!(fx.store.count_follows().unwrap(), 1);
}

#[test]
fn refollow_after_unfollow_succeeds() {
    let fx = empty_fixture();
    fx.store
        .create_follow(fx.user("1"), fx.user("2"), false)
        .unwrap();
    fx.store.delete_follow(&fx.user("1"), &fx.user("2")).unwrap();
    assert!(!fx.store.exists_follow(&fx.user("1"), &fx.user("2")).unwrap());
    fx.store
        .create_follow(fx.user("1"), fx.user("2"), false)
        .unwrap();
}

#[test]
fn unfollow_without_follow_is_not_found() {
    let fx = empty_fixture();
    let err = fx
        .store
        .delete_follow(&fx.user("1"), &fx.user("2"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn follow_rejects_unresolvable_follower() {
    let fx = empty_fixture();
    let ghost = EntityRef::new(TypeId::from_u32(1), "999");
    let err = fx
        .store
        .create_follow(ghost, fx.user("1"), false)
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn follow_rejects_unregistered_followed_type() {
    let fx = empty_fixture();
    let alien = EntityRef::new(TypeId::from_u32(99), "1");
    let err = fx
        .store
        .create_follow(fx.user("1"), alien, false)
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn follows_of_orders_by_id() {
    let fx = seeded_fixture();
    let follows = fx.store.follows_of(&fx.user("4")).unwrap();
    assert_eq!(follows.len(), 2);
    assert_eq!(follows[0].followed, fx.user("1"));
    assert!(follows[0].actor_only);
    assert_eq!(follows[1].followed, fx.group("2"));
    assert!(!follows[1].actor_only);
}

#[test]
fn list_follows_paginates() {
    let fx = seeded_fixture();
    assert_eq!(fx.store.count_follows().unwrap(), 6);
    let first = fx.store.list_follows(Page::new(4, 0)).unwrap();
    let rest = fx.store.list_follows(Page::new(4, 4)).unwrap();
    assert_eq!(first.len(), 4);
    assert_eq!(rest.len(), 2);
    assert_eq!(first[0].id, FollowId::from_i64(1));
    assert_eq!(rest[0].id, FollowId::from_i64(5));
}

#[test]
fn concurrent_duplicate_follow_has_one_winner() {
    let fx = empty_fixture();
    let store = Arc::new(fx.store);
    let follower = fx.registry.entity_ref("users", "1").unwrap();
    let followed = fx.registry.entity_ref("users", "2").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let follower = follower.clone();
            let followed = followed.clone();
            std::thread::spawn(move || store.create_follow(follower, followed, false))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(StoreError::Conflict(_)))));
    assert_eq!(store.count_follows().unwrap(), 1);
}

// ── Persistence ──────────────────────────────────────────────────

#[test]
fn store_persists_across_reopen() {
    let fx = empty_fixture();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tideline.db");
    {
        let store = StreamStore::open(&path, fx.registry.clone()).unwrap();
        store
            .create_action(NewAction::new(fx.user("1"), "joined"))
            .unwrap();
        store
            .create_follow(fx.user("1"), fx.user("2"), false)
            .unwrap();
    }
    let store = StreamStore::open(&path, fx.registry.clone()).unwrap();
    assert_eq!(store.count_actions().unwrap(), 1);
    assert_eq!(store.count_follows().unwrap(), 1);
    assert_eq!(
        store.get_action(ActionId::from_i64(1)).unwrap().verb,
        "joined"
    );
}

// ── Fixture sanity ───────────────────────────────────────────────

#[test]
fn seeded_fixture_counts() {
    let fx = seeded_fixture();
    assert_eq!(fx.store.count_actions().unwrap(), 11);
    assert_eq!(fx.store.count_follows().unwrap(), 6);
}
