//! Display formatting for the UI layer.
//!
//! Thin consumers of published state; pure string formatting only.

use chrono::{DateTime, Utc};

/// Format a countdown given in whole seconds, e.g. "2d 4h", "3h 12m", "45m".
///
/// Sub-minute remainders read as "under a minute"; zero or negative input
/// reads as "now".
#[must_use]
pub fn format_time_until(seconds: i64) -> String {
    if seconds <= 0 {
        return "now".to_owned();
    }
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        "under a minute".to_owned()
    }
}

/// Format an expiry instant as a UTC calendar date, e.g. "Mar 05, 2026".
#[must_use]
pub fn format_expiry_date(instant: DateTime<Utc>) -> String {
    instant.format("%b %d, %Y").to_string()
}

/// Pluralize a day count, e.g. "1 day", "4 days".
#[must_use]
pub fn days_label(days: i64) -> String {
    if days == 1 {
        "1 day".to_owned()
    } else {
        format!("{days} days")
    }
}
