use crate::aggregator::GroupBy;
use crate::utils::config::DEFAULT_TOP_GROUPS;
use std::path::PathBuf;

/// Arguments for the plot command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct PlotArgs {
    /// JSON file holding an array of series
    pub input: PathBuf,

    /// Output path for the JSON report
    pub output: PathBuf,

    /// Include a stacked frame in the report
    pub stack: bool,

    /// Series positions (after sorting) left out of the running total
    pub omit: Vec<usize>,

    /// Inclusive window for the grouped view
    pub start: Option<i64>,
    pub end: Option<i64>,

    pub group_by: GroupBy,

    /// Number of ranked groups kept in the report
    pub top: usize,

    /// Multiplier applied to input timestamps
    pub timestamp_scale: i64,

    /// Keep only series from this instance
    pub instance: Option<String>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for PlotArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("series.json"),
            output: PathBuf::from("report.json"),
            stack: false,
            omit: Vec::new(),
            start: None,
            end: None,
            group_by: GroupBy::default(),
            top: DEFAULT_TOP_GROUPS,
            timestamp_scale: 1,
            instance: None,
            print_summary: false,
        }
    }
}
