use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating quota configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rolling window must span at least one day.
    #[error("window_days must be greater than 0")]
    ZeroWindow,
}

/// Quota policy for the rolling submission window.
///
/// The source material states both "6 submissions per 30 days" and "3 per
/// 24 hours" in different places; both figures are therefore configuration
/// rather than literals, with the 6-per-30-days pair as the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Length of the rolling window in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Maximum submissions allowed inside the window.
    #[serde(default = "default_max_submissions")]
    pub max_submissions: u32,
    /// `remaining` at or below this value (while not at the limit) reads
    /// as a caution.
    #[serde(default = "default_caution_threshold")]
    pub caution_threshold: u32,
}

fn default_window_days() -> u32 {
    30
}

fn default_max_submissions() -> u32 {
    6
}

fn default_caution_threshold() -> u32 {
    1
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            max_submissions: default_max_submissions(),
            caution_threshold: default_caution_threshold(),
        }
    }
}

impl QuotaConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}
