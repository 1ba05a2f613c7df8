//! Report schema written to disk.
//!
//! The schema is versioned so readers can reject files from an
//! incompatible release.

use crate::aggregator::{GroupBucket, StackedFrame, TimeRange};
use crate::timeline::PlotData;
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    /// Number of series after normalization
    pub series_count: usize,

    /// Time window applied to the grouped view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<TimeRange>,

    pub plot: PlotData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacked: Option<StackedFrame>,

    /// Ranked groups, highest total first
    pub groups: Vec<GroupBucket>,
}

impl Report {
    pub fn new(plot: PlotData, groups: Vec<GroupBucket>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            series_count: plot.series.len(),
            range: None,
            plot,
            stacked: None,
            groups,
        }
    }

    pub fn with_stacked(mut self, stacked: StackedFrame) -> Self {
        self.stacked = Some(stacked);
        self
    }

    pub fn with_range(mut self, range: Option<TimeRange>) -> Self {
        self.range = range;
        self
    }
}
