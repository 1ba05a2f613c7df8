//! Configuration and constants for the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of ranked groups kept in a report when `--top` is not given
pub const DEFAULT_TOP_GROUPS: usize = 20;

/// Upper bound accepted for `--top`
pub const MAX_TOP_GROUPS: usize = 1000;

// Upstream collectors report seconds; charts want milliseconds
pub const SECONDS_TO_MILLIS: i64 = 1_000;

/// Share of the total held by the top 10% of groups above which
/// a distribution counts as highly concentrated
pub const CONCENTRATION_THRESHOLD_PERCENT: f64 = 80.0;

/// Separator between primary and secondary key when grouping per series
pub const SERIES_KEY_SEPARATOR: &str = "/";
