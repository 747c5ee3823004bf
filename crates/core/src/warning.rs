use serde::{Deserialize, Serialize};

/// UI-facing urgency derived from the published counts.
///
/// Recomputed on every publish; whitelisted identities always read `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    /// No urgency cue.
    None,
    /// Close to the limit (at or below the caution threshold).
    Caution,
    /// Every slot is taken.
    Critical,
}

impl WarningLevel {
    /// Derive the warning level from published quota figures.
    ///
    /// `caution_threshold` comes from configuration, not call sites.
    #[must_use]
    pub fn derive(
        remaining: u32,
        is_at_limit: bool,
        is_whitelisted: bool,
        caution_threshold: u32,
    ) -> Self {
        if is_whitelisted {
            return Self::None;
        }
        if is_at_limit {
            return Self::Critical;
        }
        if remaining <= caution_threshold {
            return Self::Caution;
        }
        Self::None
    }
}

impl std::fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Caution => f.write_str("caution"),
            Self::Critical => f.write_str("critical"),
        }
    }
}
