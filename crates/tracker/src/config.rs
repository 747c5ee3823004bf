use serde::{Deserialize, Serialize};

use slotwatch_core::{ConfigError, QuotaConfig};

/// Configuration for the submission tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Rolling-window quota policy.
    #[serde(default)]
    pub quota: QuotaConfig,
    /// How often the countdown ticker re-derives `time_until_next_slot`.
    #[serde(default = "default_tick_interval_seconds")]
    pub tick_interval_seconds: u64,
    /// How long a successful authority verdict stays fresh. While fresh, a
    /// `set_assets` call keeps publishing the external figures and a plain
    /// `refresh` skips the network.
    #[serde(default = "default_authority_ttl_seconds")]
    pub authority_ttl_seconds: u64,
}

fn default_tick_interval_seconds() -> u64 {
    60
}

fn default_authority_ttl_seconds() -> u64 {
    60
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            quota: QuotaConfig::default(),
            tick_interval_seconds: default_tick_interval_seconds(),
            authority_ttl_seconds: default_authority_ttl_seconds(),
        }
    }
}

impl TrackerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.quota.validate()
    }

    /// Ticker interval as a std duration.
    #[must_use]
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.tick_interval_seconds)
    }

    /// Authority freshness window as a chrono duration.
    #[must_use]
    pub fn authority_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.authority_ttl_seconds).unwrap_or(i64::MAX))
    }
}
