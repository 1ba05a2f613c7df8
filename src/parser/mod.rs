//! Series input and pre-processing.
//!
//! This module handles:
//! - Input schema for raw series (with upstream field aliases)
//! - Reading series snapshots from JSON
//! - Sorting, deduplicating and validating series before alignment

pub mod input;
pub mod normalize;
pub mod schema;

// Re-export main types
pub use input::{parse_series, read_series};
pub use normalize::{compare_keys, list_instances, normalize_series, NormalizeOptions};
pub use schema::{RawSample, RawSeries};
