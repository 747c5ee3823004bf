use thiserror::Error;

use slotwatch_core::ConfigError;

/// Errors that can occur when constructing a tracker.
///
/// Runtime failures never surface here: remote errors are folded into the
/// published state so the UI always has a usable answer.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The supplied configuration failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
