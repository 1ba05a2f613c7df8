//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Precondition violations detected while merging, aligning, grouping or stacking
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("timestamps out of order in {context} at position {index}: {current} follows {previous}")]
    UnsortedTimestamps {
        context: String,
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("duplicate timestamp {timestamp} in {context} at position {index}")]
    DuplicateTimestamp {
        context: String,
        index: usize,
        timestamp: i64,
    },

    #[error("non-finite value {value} in series {series} at timestamp {timestamp}")]
    NonFiniteValue {
        series: String,
        timestamp: i64,
        value: f64,
    },

    #[error("sum of finite values is not finite in {context}")]
    SumOverflow { context: String },

    #[error("series has an empty primary key")]
    EmptyPrimaryKey,

    #[error("row {row} has {actual} values but the timeline has {expected}")]
    LengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid time range: start {start} is after end {end}")]
    InvalidRange { start: i64, end: i64 },

    #[error("timestamp {timestamp} overflows when scaled by {scale}")]
    TimestampOverflow { timestamp: i64, scale: i64 },
}

/// Errors that can occur while reading series input
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid series input: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
