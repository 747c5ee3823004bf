//! Rolling-window admission arithmetic.
//!
//! All boundary math is UTC with day-level truncation: the window opens at
//! `start_of_utc_day(now) - window_days`, and a record sitting exactly on
//! the boundary instant is still inside. `now` is always injected so the
//! functions are deterministic under test.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::submission::{ActiveSubmission, SubmissionRecord};

const SECONDS_PER_DAY: i64 = 86_400;

/// Truncate an instant to the start of its UTC calendar day.
#[must_use]
pub fn start_of_utc_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// The earliest `submitted_at` still inside the rolling window (inclusive).
#[must_use]
pub fn window_start(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    start_of_utc_day(now) - Duration::days(i64::from(window_days))
}

/// Whole days until `expires_at`, rounded up, clamped at zero.
#[must_use]
pub fn days_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (expires_at - now).num_seconds();
    if seconds <= 0 { 0 } else { (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY }
}

/// Select the records still counting against the quota at `now`.
///
/// - Records with an excluded status are dropped unconditionally, even if
///   submitted a second ago.
/// - Records with no usable `submitted_at` are dropped, never fatal.
/// - A record at exactly the window boundary is included.
///
/// Output is sorted ascending by `submitted_at`: index 0 is the submission
/// whose slot frees up next, and expiry scheduling relies on that ordering.
#[must_use]
pub fn active_submissions(
    records: &[SubmissionRecord],
    now: DateTime<Utc>,
    window_days: u32,
) -> Vec<ActiveSubmission> {
    let boundary = window_start(now, window_days);
    let window = Duration::days(i64::from(window_days));

    let mut active: Vec<ActiveSubmission> = records
        .iter()
        .filter(|r| !r.status.is_excluded())
        .filter_map(|r| {
            let submitted_at = r.submitted_at?;
            if submitted_at < boundary {
                return None;
            }
            let expires_at = submitted_at + window;
            Some(ActiveSubmission {
                id: r.id.clone(),
                name: r.name.clone(),
                submitted_at,
                status: r.status,
                expires_at,
                days_until_expiry: days_until(expires_at, now),
            })
        })
        .collect();

    active.sort_by_key(|s| s.submitted_at);
    active
}
