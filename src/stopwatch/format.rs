use serde::Serializer;
use std::time::Duration;

const MILLIS_PER_MINUTE: u64 = 60_000;
const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_CENTI: u64 = 10;

/// Formats elapsed milliseconds as `MM:SS.CC`.
///
/// Both fields are zero-padded to two digits; minutes widen past two digits when needed.
/// Sub-centisecond remainders are truncated so the readout never runs ahead of the clock.
pub fn format_time(ms: u64) -> String {
    let minutes = ms / MILLIS_PER_MINUTE;
    let remainder = ms % MILLIS_PER_MINUTE;
    let seconds = remainder / MILLIS_PER_SECOND;
    let centis = (remainder % MILLIS_PER_SECOND) / MILLIS_PER_CENTI;

    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

pub fn format_duration(duration: Duration) -> String {
    format_time(as_millis(duration))
}

pub fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(as_millis(*duration))
}
