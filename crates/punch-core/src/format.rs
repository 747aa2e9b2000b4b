//! Millisecond durations to display strings.

use chrono::{DateTime, Local};

/// Formats milliseconds as `HH:MM:SS`, flooring to whole seconds.
///
/// Negative durations are treated as 0.
#[must_use]
pub fn format_hms(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Formats milliseconds as `Xh Ym` if >= 1 hour, `Ym` otherwise.
///
/// Rounds to the nearest minute. Negative durations are treated as 0.
#[must_use]
pub fn format_hm(ms: i64) -> String {
    let total_minutes = (ms.max(0) + 30_000) / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Formats a local timestamp as wall-clock `HH:MM`.
#[must_use]
pub fn format_clock(at: DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}
