use std::str::FromStr;
use tideline_types::{ActionId, FollowId, TypeId};

// ── TypeId ───────────────────────────────────────────────────────

#[test]
fn type_id_roundtrip() {
    let id = TypeId::from_u32(3);
    assert_eq!(id.as_u32(), 3);
}

#[test]
fn type_id_display_parse() {
    let id = TypeId::from_u32(7);
    let parsed = TypeId::from_str(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn type_id_from_str_invalid() {
    assert!(TypeId::from_str("not-a-number").is_err());
}

#[test]
fn type_id_serde_transparent() {
    let json = serde_json::to_string(&TypeId::from_u32(5)).unwrap();
    assert_eq!(json, "5");
    let parsed: TypeId = serde_json::from_str("5").unwrap();
    assert_eq!(parsed, TypeId::from_u32(5));
}

#[test]
fn type_id_ordering() {
    assert!(TypeId::from_u32(1) < TypeId::from_u32(2));
}

// ── ActionId / FollowId ──────────────────────────────────────────

#[test]
fn action_id_roundtrip() {
    let id = ActionId::from_i64(42);
    assert_eq!(id.as_i64(), 42);
    assert_eq!(id.to_string(), "42");
}

#[test]
fn action_id_ordering_matches_raw() {
    assert!(ActionId::from_i64(10) > ActionId::from_i64(9));
}

#[test]
fn action_id_serde_transparent() {
    let json = serde_json::to_string(&ActionId::from_i64(11)).unwrap();
    assert_eq!(json, "11");
}

#[test]
fn follow_id_roundtrip() {
    let id = FollowId::from_i64(6);
    assert_eq!(id.as_i64(), 6);
    let parsed = FollowId::from_str("6").unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn ids_hash_eq() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(ActionId::from_i64(1));
    set.insert(ActionId::from_i64(1));
    assert_eq!(set.len(), 1);
}
