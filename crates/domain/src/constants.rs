//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

/// Application namespace used to derive persistence keys.
pub const APP_NAME: &str = "timetrail";

/// Separator used when a label path is rendered as a single string.
pub const TASK_DELIMITER: &str = " / ";

// Local persistence keys are `<namespace><suffix>`
pub const LOCAL_ENTRIES_KEY_SUFFIX: &str = "-entries-local";
pub const LEGACY_ENTRIES_KEY_SUFFIX: &str = "-entries";

// Query defaults
pub const DEFAULT_TIMEZONE: &str = "UTC";

// Remote account service
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

// Group key formats (strftime)
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";
pub const MONTH_KEY_FORMAT: &str = "%Y-%m-01";
pub const YEAR_KEY_FORMAT: &str = "%Y-01-01";
