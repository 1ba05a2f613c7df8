//! Common timeline construction and per-series alignment.
//!
//! This module turns independently sampled series into:
//! - One strictly increasing timeline (union of all timestamps)
//! - Each series re-expressed against it, with gaps marked absent

pub mod aligner;
pub mod merger;

pub use aligner::align;
pub use merger::{merge_all, merge_all_checked, merge_two};

use crate::parser::schema::RawSeries;
use crate::utils::error::ValidationError;
use log::debug;
use serde::{Deserialize, Serialize};

/// A series projected onto the shared timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    pub primary_key: String,
    pub secondary_key: Option<String>,

    /// Same length as the timeline; `None` where the series has no sample
    pub values: Vec<Option<f64>>,
}

/// Timeline plus every series aligned to it, in input order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotData {
    pub timeline: Vec<i64>,
    pub series: Vec<AlignedSeries>,
}

impl PlotData {
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty() && self.series.is_empty()
    }

    /// Aligned value rows, one per series
    pub fn rows(&self) -> Vec<Vec<Option<f64>>> {
        self.series.iter().map(|s| s.values.clone()).collect()
    }
}

/// Build the shared timeline and align every series to it
///
/// **Public** - main entry point for plot preparation
///
/// # Arguments
/// * `series` - normalized series; output keeps this order
///
/// # Errors
/// Fails on the first series that is unsorted, repeats a timestamp or
/// holds a non-finite value.
pub fn build_plot_data(series: &[RawSeries]) -> Result<PlotData, ValidationError> {
    for s in series {
        aligner::check_series(s)?;
    }

    let timeline = merge_all(series.iter().map(RawSeries::timestamps).collect());

    let aligned: Vec<AlignedSeries> = series
        .iter()
        .map(|s| aligner::project(s, &timeline))
        .collect();

    debug!(
        "Aligned {} series onto {} timestamps",
        aligned.len(),
        timeline.len()
    );

    Ok(PlotData {
        timeline,
        series: aligned,
    })
}

/// Fail unless every timestamp is strictly greater than the one before
pub fn validate_strictly_increasing(
    timestamps: impl IntoIterator<Item = i64>,
    context: &str,
) -> Result<(), ValidationError> {
    let mut previous: Option<i64> = None;

    for (index, current) in timestamps.into_iter().enumerate() {
        match previous {
            Some(prev) if current == prev => {
                return Err(ValidationError::DuplicateTimestamp {
                    context: context.to_string(),
                    index,
                    timestamp: current,
                });
            }
            Some(prev) if current < prev => {
                return Err(ValidationError::UnsortedTimestamps {
                    context: context.to_string(),
                    index,
                    previous: prev,
                    current,
                });
            }
            _ => {}
        }
        previous = Some(current);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_plot_data_two_series() {
        let series = vec![
            RawSeries::new("A", None).with_samples([(1, 5.0), (2, 7.0)]),
            RawSeries::new("B", None).with_samples([(2, 3.0), (3, 9.0)]),
        ];

        let plot = build_plot_data(&series).unwrap();

        assert_eq!(plot.timeline, vec![1, 2, 3]);
        assert_eq!(plot.series[0].values, vec![Some(5.0), Some(7.0), None]);
        assert_eq!(plot.series[1].values, vec![None, Some(3.0), Some(9.0)]);
    }

    #[test]
    fn test_build_plot_data_empty() {
        let plot = build_plot_data(&[]).unwrap();
        assert!(plot.is_empty());
    }

    #[test]
    fn test_build_plot_data_names_bad_series() {
        let series = vec![RawSeries::new("q", Some("p")).with_samples([(2, 1.0), (1, 1.0)])];
        let err = build_plot_data(&series).unwrap_err();
        assert!(err.to_string().contains("series q:p"));
    }

    #[test]
    fn test_validate_strictly_increasing() {
        assert!(validate_strictly_increasing([1, 2, 3], "t").is_ok());
        assert!(validate_strictly_increasing(Vec::new(), "t").is_ok());
        assert!(validate_strictly_increasing([1, 1], "t").is_err());
        assert!(validate_strictly_increasing([2, 1], "t").is_err());
    }
}
