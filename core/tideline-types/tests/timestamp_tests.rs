use chrono::NaiveDate;
use tideline_types::{format_timestamp, parse_timestamp};

fn ts(h: u32, m: u32, s: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[test]
fn storage_format_roundtrip() {
    let original = ts(13, 45, 59);
    let text = format_timestamp(&original);
    let parsed = parse_timestamp(&text).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn storage_format_is_fixed_width() {
    // Same width regardless of sub-second precision, so text ordering
    // equals chronological ordering.
    let a = format_timestamp(&ts(0, 0, 0));
    let b = format_timestamp(
        &ts(0, 0, 1)
            .checked_add_signed(chrono::Duration::microseconds(123))
            .unwrap(),
    );
    assert_eq!(a.len(), b.len());
    assert_eq!(a, "2000-01-01T00:00:00.000000");
}

#[test]
fn storage_text_sorts_chronologically() {
    let times = [ts(0, 0, 0), ts(0, 0, 1), ts(0, 1, 0), ts(12, 0, 0)];
    let mut texts: Vec<String> = times.iter().map(format_timestamp).collect();
    let sorted = texts.clone();
    texts.sort();
    assert_eq!(texts, sorted);
}

#[test]
fn parse_rejects_garbage() {
    assert!(parse_timestamp("yesterday").is_err());
    assert!(parse_timestamp("").is_err());
}

#[test]
fn wire_serialization_has_no_timezone_suffix() {
    // Naive timestamps serialize ISO-8601 without a timezone suffix.
    let json = serde_json::to_string(&ts(0, 0, 0)).unwrap();
    assert_eq!(json, "\"2000-01-01T00:00:00\"");
}
