use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::AssetId;

/// Lifecycle status of a submitted asset, as reported by the asset source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Listed and visible on the marketplace.
    Live,
    /// Submitted and awaiting review.
    Pending,
    /// Withdrawn by the creator or removed by moderation.
    Delisted,
}

impl SubmissionStatus {
    /// Whether this status permanently excludes the record from quota
    /// counting, regardless of how recently it was submitted.
    #[must_use]
    pub fn is_excluded(self) -> bool {
        matches!(self, Self::Delisted)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Pending => f.write_str("pending"),
            Self::Delisted => f.write_str("delisted"),
        }
    }
}

/// One creator-submitted asset, as pushed by the asset source.
///
/// `submitted_at` is the source of truth for window membership. A record
/// whose timestamp is missing or unparseable carries `None` and is skipped
/// by the window calculator rather than failing the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Opaque asset key.
    pub id: AssetId,
    /// Display label.
    pub name: String,
    /// When the asset was submitted, UTC.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Current listing status.
    pub status: SubmissionStatus,
}

impl SubmissionRecord {
    /// Create a record with a known submission instant.
    #[must_use]
    pub fn new(
        id: impl Into<AssetId>,
        name: impl Into<String>,
        submitted_at: DateTime<Utc>,
        status: SubmissionStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            submitted_at: Some(submitted_at),
            status,
        }
    }
}

/// Accept RFC 3339 strings, pass `null`/missing through as `None`, and fold
/// any unparseable value to `None` instead of failing the batch.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// A record admitted to the rolling window, annotated with its expiry.
///
/// Only the window calculator constructs these; `expires_at` and
/// `days_until_expiry` are derived at evaluation time and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSubmission {
    /// Opaque asset key.
    pub id: AssetId,
    /// Display label.
    pub name: String,
    /// When the asset was submitted, UTC.
    pub submitted_at: DateTime<Utc>,
    /// Current listing status.
    pub status: SubmissionStatus,
    /// Instant at which this submission stops counting against the quota.
    pub expires_at: DateTime<Utc>,
    /// Whole days until expiry, rounded up, never negative.
    pub days_until_expiry: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_exclusion() {
        assert!(SubmissionStatus::Delisted.is_excluded());
        assert!(!SubmissionStatus::Live.is_excluded());
        assert!(!SubmissionStatus::Pending.is_excluded());
    }

    #[test]
    fn status_serde_snake_case() {
        let json = serde_json::to_string(&SubmissionStatus::Delisted).unwrap();
        assert_eq!(json, "\"delisted\"");
        let back: SubmissionStatus = serde_json::from_str("\"live\"").unwrap();
        assert_eq!(back, SubmissionStatus::Live);
    }

    #[test]
    fn record_deserializes_valid_timestamp() {
        let json = r#"{
            "id": "asset-1",
            "name": "Portfolio Dark",
            "submitted_at": "2026-03-01T12:00:00Z",
            "status": "live"
        }"#;
        let record: SubmissionRecord = serde_json::from_str(json).unwrap();
        assert!(record.submitted_at.is_some());
    }

    #[test]
    fn record_tolerates_missing_timestamp() {
        let json = r#"{"id": "asset-2", "name": "Shop Lite", "status": "pending"}"#;
        let record: SubmissionRecord = serde_json::from_str(json).unwrap();
        assert!(record.submitted_at.is_none());
    }

    #[test]
    fn record_tolerates_malformed_timestamp() {
        let json = r#"{
            "id": "asset-3",
            "name": "Agency One",
            "submitted_at": "last tuesday",
            "status": "live"
        }"#;
        let record: SubmissionRecord = serde_json::from_str(json).unwrap();
        assert!(record.submitted_at.is_none());

        let json = r#"{
            "id": "asset-4",
            "name": "Agency Two",
            "submitted_at": 17000000,
            "status": "live"
        }"#;
        let record: SubmissionRecord = serde_json::from_str(json).unwrap();
        assert!(record.submitted_at.is_none());
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = SubmissionRecord::new(
            "asset-5",
            "Landing Kit",
            Utc::now(),
            SubmissionStatus::Live,
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: SubmissionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
