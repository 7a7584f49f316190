//! Naive timestamp formatting shared by the store and the API surface.
//!
//! Timestamps are timezone-naive throughout. On the wire they serialize as
//! ISO-8601 without a timezone suffix (chrono's serde default for
//! `NaiveDateTime`). In storage they use a fixed-width variant so that
//! lexicographic text ordering equals chronological ordering.

use crate::Error;
use chrono::NaiveDateTime;

/// Fixed-width storage format: microsecond precision, always 6 fraction digits.
pub const STORE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Formats a timestamp for storage.
#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(STORE_TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp from its storage representation.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, Error> {
    NaiveDateTime::parse_from_str(s, STORE_TIMESTAMP_FORMAT)
        .map_err(|e| Error::InvalidTimestamp(format!("{s}: {e}")))
}
