//! Report output.
//!
//! This module handles the versioned report schema and writing it to
//! disk as JSON.

pub mod json;
pub mod report;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use report::Report;
