// src/recency.rs
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Lookback window applied when none is configured.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 180;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed timestamp: {0:?}")]
pub struct MalformedTimestamp(pub String);

/// Parse a loosely-formatted timestamp into a naive instant. Any timezone
/// component is stripped (wall-clock time is kept), so all comparisons are
/// timezone-naive.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, MalformedTimestamp> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    Err(MalformedTimestamp(s.to_string()))
}

/// True iff the item's timestamp falls within `window` of `now`, boundary
/// inclusive.
pub fn is_recent(
    timestamp_str: &str,
    now: NaiveDateTime,
    window: Duration,
) -> Result<bool, MalformedTimestamp> {
    let parsed = parse_timestamp(timestamp_str)?;
    Ok(now - parsed <= window)
}
