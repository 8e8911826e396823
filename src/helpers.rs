//! Shared utility helpers for engine timestamps.

use chrono::NaiveDateTime;

/// Textual layout of the timestamps engines report.
pub const ENGINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses an engine timestamp. Anything not in [`ENGINE_TIME_FORMAT`] is
/// rejected rather than guessed at.
pub fn parse_engine_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), ENGINE_TIME_FORMAT).ok()
}

/// Milliseconds between two engine timestamps, if both parse and are ordered.
pub fn elapsed_millis(start: &str, end: &str) -> Option<u64> {
    let start = parse_engine_timestamp(start)?;
    let end = parse_engine_timestamp(end)?;
    u64::try_from((end - start).num_milliseconds()).ok()
}
