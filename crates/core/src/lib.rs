pub mod config;
pub mod display;
pub mod evaluate;
pub mod submission;
pub mod types;
pub mod warning;
pub mod window;

pub use config::{ConfigError, QuotaConfig};
pub use display::{days_label, format_expiry_date, format_time_until};
pub use evaluate::{LocalUsage, evaluate_local};
pub use submission::{ActiveSubmission, SubmissionRecord, SubmissionStatus};
pub use types::{AssetId, CreatorId};
pub use warning::WarningLevel;
pub use window::{active_submissions, days_until, start_of_utc_day, window_start};
