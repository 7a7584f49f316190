use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tideline_types::{Action, ActionId, EntityRef, Follow, FollowId, NewAction, TypeId};

fn user(id: &str) -> EntityRef {
    EntityRef::new(TypeId::from_u32(1), id)
}

fn group(id: &str) -> EntityRef {
    EntityRef::new(TypeId::from_u32(2), id)
}

fn testdate() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn sample_action() -> Action {
    Action {
        id: ActionId::from_i64(1),
        actor: user("1"),
        verb: "joined".into(),
        action_object: None,
        target: Some(group("1")),
        timestamp: testdate(),
        description: None,
        public: true,
        data: None,
    }
}

// ── NewAction builder ────────────────────────────────────────────

#[test]
fn new_action_defaults() {
    let new = NewAction::new(user("1"), "joined");
    assert_eq!(new.verb, "joined");
    assert!(new.public);
    assert!(new.target.is_none());
    assert!(new.action_object.is_none());
    assert!(new.timestamp.is_none());
    assert!(new.description.is_none());
    assert!(new.data.is_none());
}

#[test]
fn new_action_builder_chain() {
    let new = NewAction::new(user("1"), "commented on")
        .target(group("1"))
        .action_object(group("2"))
        .timestamp(testdate())
        .description("talked about a group")
        .private()
        .data(serde_json::json!({"channel": "web"}));
    assert_eq!(new.target, Some(group("1")));
    assert_eq!(new.action_object, Some(group("2")));
    assert_eq!(new.timestamp, Some(testdate()));
    assert_eq!(new.description.as_deref(), Some("talked about a group"));
    assert!(!new.public);
    assert_eq!(new.data, Some(serde_json::json!({"channel": "web"})));
}

// ── Participants ─────────────────────────────────────────────────

#[test]
fn participants_actor_only() {
    let mut action = sample_action();
    action.target = None;
    let participants: Vec<_> = action.participants().cloned().collect();
    assert_eq!(participants, vec![user("1")]);
}

#[test]
fn participants_include_target_and_object() {
    let mut action = sample_action();
    action.action_object = Some(user("2"));
    let participants: Vec<_> = action.participants().cloned().collect();
    assert_eq!(participants, vec![user("1"), group("1"), user("2")]);
}

#[test]
fn involves_checks_every_role() {
    let mut action = sample_action();
    action.action_object = Some(user("2"));
    assert!(action.involves(&user("1")));
    assert!(action.involves(&group("1")));
    assert!(action.involves(&user("2")));
    assert!(!action.involves(&user("3")));
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn action_serde_roundtrip() {
    let action = sample_action();
    let json = serde_json::to_string(&action).unwrap();
    let parsed: Action = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, action);
}

#[test]
fn action_serde_omits_absent_optionals() {
    let json = serde_json::to_value(sample_action()).unwrap();
    let obj = json.as_object().unwrap();
    assert!(obj.contains_key("target"));
    assert!(!obj.contains_key("action_object"));
    assert!(!obj.contains_key("description"));
    assert!(!obj.contains_key("data"));
}

#[test]
fn action_timestamp_serializes_naive_iso() {
    let json = serde_json::to_value(sample_action()).unwrap();
    assert_eq!(json["timestamp"], "2000-01-01T00:00:00");
}

#[test]
fn follow_serde_roundtrip() {
    let follow = Follow {
        id: FollowId::from_i64(1),
        follower: user("1"),
        followed: group("1"),
        actor_only: true,
        started: testdate(),
    };
    let json = serde_json::to_string(&follow).unwrap();
    let parsed: Follow = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, follow);
}
