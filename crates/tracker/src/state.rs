use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use slotwatch_core::{ActiveSubmission, WarningLevel};

/// Which evaluator produced the currently published figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// The remote authority's answer.
    External,
    /// The deterministic local fallback.
    Local,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::External => f.write_str("external"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// One published snapshot of tracker state.
///
/// Constructed whole and swapped atomically on every transition; consumers
/// never observe partial-field mutation. There is no state in which the
/// numeric fields are absent: the local evaluator seeds them before any
/// network attempt completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionState {
    /// Active submissions only, oldest first (index 0 expires next).
    pub submissions: Vec<ActiveSubmission>,
    /// The quota limit currently in effect.
    pub limit: u32,
    /// Slots still open, clamped at zero.
    pub remaining: u32,
    /// Whether every slot is taken.
    pub is_at_limit: bool,
    /// When the oldest active submission leaves the window, if any.
    pub next_expiry_at: Option<DateTime<Utc>>,
    /// Whether the identity is exempt from the limit. When set, `remaining`
    /// and `is_at_limit` are cosmetic.
    pub is_whitelisted: bool,
    /// Which evaluator produced the figures above.
    pub data_source: DataSource,
    /// Whether an authority call is currently in flight.
    pub is_loading: bool,
    /// Whether the last authority attempt was skipped by dev mode.
    pub is_dev_mode: bool,
    /// Whether the last authority attempt failed.
    pub has_error: bool,
    /// Failure tag of the last authority attempt, for the retry affordance.
    pub error_message: Option<String>,
    /// UI-facing urgency, recomputed on every publish.
    pub warning_level: WarningLevel,
    /// Seconds until the next slot frees up, clamped at zero.
    pub time_until_next_slot_seconds: Option<i64>,
}

impl SubmissionState {
    /// `is_at_limit` as UI logic should read it: whitelisted identities are
    /// never at their limit.
    #[must_use]
    pub fn effective_is_at_limit(&self) -> bool {
        self.is_at_limit && !self.is_whitelisted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(is_at_limit: bool, is_whitelisted: bool) -> SubmissionState {
        SubmissionState {
            submissions: Vec::new(),
            limit: 6,
            remaining: 0,
            is_at_limit,
            next_expiry_at: None,
            is_whitelisted,
            data_source: DataSource::Local,
            is_loading: false,
            is_dev_mode: false,
            has_error: false,
            error_message: None,
            warning_level: WarningLevel::None,
            time_until_next_slot_seconds: None,
        }
    }

    #[test]
    fn whitelist_masks_at_limit() {
        assert!(state(true, false).effective_is_at_limit());
        assert!(!state(true, true).effective_is_at_limit());
        assert!(!state(false, false).effective_is_at_limit());
    }

    #[test]
    fn data_source_serde_tags() {
        assert_eq!(
            serde_json::to_string(&DataSource::External).unwrap(),
            "\"external\""
        );
        assert_eq!(
            serde_json::to_string(&DataSource::Local).unwrap(),
            "\"local\""
        );
    }

    #[test]
    fn state_serde_roundtrip() {
        let snapshot = state(true, false);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SubmissionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
