//! Local fallback evaluation.
//!
//! This is the availability floor of the tracker: a pure, synchronous
//! computation that must produce a usable answer with zero network access,
//! zero external services, and a cold cache.

use chrono::{DateTime, Duration, Utc};

use crate::submission::ActiveSubmission;

/// Quota figures derived purely from the local record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalUsage {
    /// Slots still open, clamped at zero.
    pub remaining: u32,
    /// Whether every slot is taken.
    pub is_at_limit: bool,
    /// When the oldest active submission leaves the window, if any.
    pub next_expiry_at: Option<DateTime<Utc>>,
    /// Time until the next slot frees up, clamped at zero.
    pub time_until_next_slot: Option<Duration>,
}

/// Derive quota figures from the active set against a fixed limit.
///
/// With zero active records `is_at_limit` is `false` and both expiry fields
/// are `None`, even when `limit == 0`: a zero-limit account is only at its
/// limit once it actually has submissions in flight.
#[must_use]
pub fn evaluate_local(active: &[ActiveSubmission], limit: u32, now: DateTime<Utc>) -> LocalUsage {
    let used = u32::try_from(active.len()).unwrap_or(u32::MAX);
    let remaining = limit.saturating_sub(used);
    let is_at_limit = !active.is_empty() && remaining == 0;

    let next_expiry_at = active.first().map(|s| s.expires_at);
    let time_until_next_slot =
        next_expiry_at.map(|expiry| (expiry - now).max(Duration::zero()));

    LocalUsage {
        remaining,
        is_at_limit,
        next_expiry_at,
        time_until_next_slot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{SubmissionRecord, SubmissionStatus};
    use crate::window::active_submissions;

    fn active_set(count: usize, now: DateTime<Utc>) -> Vec<ActiveSubmission> {
        let records: Vec<SubmissionRecord> = (0..count)
            .map(|i| {
                SubmissionRecord::new(
                    format!("asset-{i}"),
                    format!("Asset {i}"),
                    now - Duration::days(i64::try_from(i).unwrap() + 1),
                    SubmissionStatus::Live,
                )
            })
            .collect();
        active_submissions(&records, now, 30)
    }

    #[test]
    fn remaining_clamps_at_zero() {
        let now = Utc::now();
        let usage = evaluate_local(&active_set(8, now), 6, now);
        assert_eq!(usage.remaining, 0);
        assert!(usage.is_at_limit);
    }

    #[test]
    fn under_limit() {
        let now = Utc::now();
        let usage = evaluate_local(&active_set(4, now), 6, now);
        assert_eq!(usage.remaining, 2);
        assert!(!usage.is_at_limit);
    }

    #[test]
    fn empty_set_is_never_at_limit() {
        let now = Utc::now();
        let usage = evaluate_local(&[], 0, now);
        assert!(!usage.is_at_limit);
        assert_eq!(usage.remaining, 0);
        assert!(usage.next_expiry_at.is_none());
        assert!(usage.time_until_next_slot.is_none());
    }

    #[test]
    fn next_expiry_tracks_oldest() {
        let now = Utc::now();
        let active = active_set(3, now);
        let usage = evaluate_local(&active, 6, now);
        // active_set sorts oldest first, so the first element expires first.
        assert_eq!(usage.next_expiry_at, Some(active[0].expires_at));
        let until = usage.time_until_next_slot.unwrap();
        assert!(until > Duration::zero());
        assert_eq!(until, active[0].expires_at - now);
    }

    #[test]
    fn time_until_next_slot_clamps_at_zero() {
        let now = Utc::now();
        let mut active = active_set(1, now);
        // Force an already-passed expiry.
        active[0].expires_at = now - Duration::minutes(5);
        let usage = evaluate_local(&active, 6, now);
        assert_eq!(usage.time_until_next_slot, Some(Duration::zero()));
    }
}
