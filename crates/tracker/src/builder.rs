use std::sync::Arc;

use slotwatch_client::QuotaAuthority;
use slotwatch_core::SubmissionRecord;

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::tracker::SubmissionTracker;

/// Fluent builder for constructing a [`SubmissionTracker`].
///
/// Everything is optional: with no authority the tracker runs on local
/// figures alone, and with no seed assets it starts empty. The first
/// snapshot is published at build time, so a subscriber attached right
/// after `build()` already sees usable numbers.
pub struct TrackerBuilder {
    config: TrackerConfig,
    authority: Option<Arc<dyn QuotaAuthority>>,
    records: Vec<SubmissionRecord>,
}

impl TrackerBuilder {
    /// Create a new builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: TrackerConfig::default(),
            authority: None,
            records: Vec::new(),
        }
    }

    /// Set the tracker configuration.
    #[must_use]
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the remote authority implementation.
    #[must_use]
    pub fn authority(mut self, authority: Arc<dyn QuotaAuthority>) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Seed the initial asset list.
    #[must_use]
    pub fn assets(mut self, records: Vec<SubmissionRecord>) -> Self {
        self.records = records;
        self
    }

    /// Validate the configuration and build the tracker.
    pub fn build(self) -> Result<SubmissionTracker, TrackerError> {
        self.config.validate()?;
        Ok(SubmissionTracker::new_seeded(
            self.config,
            self.authority,
            self.records,
        ))
    }
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
