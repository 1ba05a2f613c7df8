//! Build cumulative stacked layers from aligned rows.
//!
//! Each included row becomes the running sum of itself and every
//! included row before it, so drawing the rows as lines and shading
//! between neighbours gives a stacked area chart.
//!
//! Example with rows A=[5, 7, -] and B=[-, 3, 9]:
//! A => [5, 7, 0], B => [5, 10, 9], one band between B (top) and A (bottom).

use crate::timeline::PlotData;
use crate::utils::error::ValidationError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Region to shade between two cumulative layers
///
/// Indexes are positions in [`StackedFrame::rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub top: usize,
    pub bottom: usize,
}

impl Band {
    pub fn new(top: usize, bottom: usize) -> Self {
        Self { top, bottom }
    }

    /// Indexes shifted by one, for renderers that keep the timeline at row 0
    pub fn frame_indices(&self) -> (usize, usize) {
        (self.top + 1, self.bottom + 1)
    }
}

/// One output row of a stacked frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum StackedRow {
    /// Running total through this row, absent values counted as zero
    Cumulative(Vec<f64>),

    /// Omitted row, copied through untouched
    PassThrough(Vec<Option<f64>>),
}

impl StackedRow {
    pub fn is_cumulative(&self) -> bool {
        matches!(self, StackedRow::Cumulative(_))
    }

    pub fn as_cumulative(&self) -> Option<&[f64]> {
        match self {
            StackedRow::Cumulative(values) => Some(values),
            StackedRow::PassThrough(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            StackedRow::Cumulative(values) => values.len(),
            StackedRow::PassThrough(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render-ready stacked data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StackedFrame {
    pub timeline: Vec<i64>,
    pub rows: Vec<StackedRow>,
    pub bands: Vec<Band>,
}

/// Stack aligned rows into cumulative layers
///
/// **Public** - main entry point for stacked rendering
///
/// # Arguments
/// * `timeline` - shared timeline, copied to the output as-is
/// * `rows` - one aligned row per series, each as long as `timeline`
/// * `omit` - rows for which this returns true are passed through and
///   do not contribute to the running total
///
/// # Returns
/// Cumulative rows plus one band per included row that has a later
/// included row, pairing it with the nearest such row.
///
/// # Errors
/// * `ValidationError::LengthMismatch` - a row does not match the timeline
/// * `ValidationError::NonFiniteValue` - an included row holds NaN or infinity
/// * `ValidationError::SumOverflow` - a running total overflows
pub fn stack<F>(
    timeline: &[i64],
    rows: &[Vec<Option<f64>>],
    omit: F,
) -> Result<StackedFrame, ValidationError>
where
    F: Fn(usize) -> bool,
{
    for (index, row) in rows.iter().enumerate() {
        if row.len() != timeline.len() {
            return Err(ValidationError::LengthMismatch {
                row: index,
                expected: timeline.len(),
                actual: row.len(),
            });
        }
    }

    // Local to this call; never shared between frames
    let mut running = vec![0.0; timeline.len()];
    let mut stacked = Vec::with_capacity(rows.len());
    let mut included = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        if omit(index) {
            stacked.push(StackedRow::PassThrough(row.clone()));
            continue;
        }

        for (column, (sum, value)) in running.iter_mut().zip(row).enumerate() {
            let value = value.unwrap_or(0.0);
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue {
                    series: format!("row {}", index),
                    timestamp: timeline[column],
                    value,
                });
            }
            *sum += value;
            if !sum.is_finite() {
                return Err(ValidationError::SumOverflow {
                    context: format!("row {} at timestamp {}", index, timeline[column]),
                });
            }
        }

        stacked.push(StackedRow::Cumulative(running.clone()));
        included.push(index);
    }

    let bands: Vec<Band> = included
        .windows(2)
        .map(|pair| Band::new(pair[1], pair[0]))
        .collect();

    debug!(
        "Stacked {} of {} rows over {} timestamps ({} bands)",
        included.len(),
        rows.len(),
        timeline.len(),
        bands.len()
    );

    Ok(StackedFrame {
        timeline: timeline.to_vec(),
        rows: stacked,
        bands,
    })
}

/// Stack every series of a plot, in plot order
pub fn stack_plot_data<F>(plot: &PlotData, omit: F) -> Result<StackedFrame, ValidationError>
where
    F: Fn(usize) -> bool,
{
    stack(&plot.timeline, &plot.rows(), omit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stack_two_rows() {
        let rows = vec![
            vec![Some(5.0), Some(7.0), None],
            vec![None, Some(3.0), Some(9.0)],
        ];

        let frame = stack(&[1, 2, 3], &rows, |_| false).unwrap();

        assert_eq!(frame.timeline, vec![1, 2, 3]);
        assert_eq!(frame.rows[0], StackedRow::Cumulative(vec![5.0, 7.0, 0.0]));
        assert_eq!(frame.rows[1], StackedRow::Cumulative(vec![5.0, 10.0, 9.0]));
        assert_eq!(frame.bands, vec![Band::new(1, 0)]);
    }

    #[test]
    fn test_stack_omitted_row_passes_through() {
        let rows = vec![
            vec![Some(1.0), Some(1.0)],
            vec![Some(100.0), None],
            vec![Some(2.0), Some(2.0)],
        ];

        let frame = stack(&[10, 20], &rows, |i| i == 1).unwrap();

        assert_eq!(frame.rows[1], StackedRow::PassThrough(vec![Some(100.0), None]));
        assert_eq!(frame.rows[2], StackedRow::Cumulative(vec![3.0, 3.0]));
        assert_eq!(frame.bands, vec![Band::new(2, 0)]);
    }

    #[test]
    fn test_stack_last_included_row_has_no_band() {
        let rows = vec![vec![Some(1.0)], vec![Some(1.0)], vec![Some(1.0)]];
        let frame = stack(&[0], &rows, |i| i == 2).unwrap();
        assert_eq!(frame.bands, vec![Band::new(1, 0)]);
    }

    #[test]
    fn test_stack_single_row_no_bands() {
        let frame = stack(&[0, 1], &[vec![Some(4.0), None]], |_| false).unwrap();
        assert!(frame.bands.is_empty());
        assert_eq!(frame.rows[0].as_cumulative(), Some(&[4.0, 0.0][..]));
    }

    #[test]
    fn test_stack_all_omitted() {
        let rows = vec![vec![Some(1.0)], vec![None]];
        let frame = stack(&[0], &rows, |_| true).unwrap();
        assert!(frame.rows.iter().all(|r| !r.is_cumulative()));
        assert!(frame.bands.is_empty());
    }

    #[test]
    fn test_stack_empty() {
        let frame = stack(&[], &[], |_| false).unwrap();
        assert_eq!(frame, StackedFrame::default());
    }

    #[test]
    fn test_stack_length_mismatch() {
        let err = stack(&[1, 2], &[vec![Some(1.0)]], |_| false).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LengthMismatch {
                row: 0,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_stack_rejects_overflowing_layer() {
        let rows = vec![vec![None, Some(1.5e308)], vec![Some(1.0), Some(1.5e308)]];

        let err = stack(&[7, 8], &rows, |_| false).unwrap_err();

        assert_eq!(
            err,
            ValidationError::SumOverflow {
                context: "row 1 at timestamp 8".to_string()
            }
        );
    }

    #[test]
    fn test_stack_overflow_ignores_omitted_rows() {
        let rows = vec![vec![Some(1.5e308)], vec![Some(1.5e308)]];
        let frame = stack(&[0], &rows, |i| i == 1).unwrap();
        assert_eq!(frame.rows[0], StackedRow::Cumulative(vec![1.5e308]));
    }

    #[test]
    fn test_stack_negative_values_accumulate() {
        let rows = vec![vec![Some(5.0)], vec![Some(-2.0)]];
        let frame = stack(&[0], &rows, |_| false).unwrap();
        assert_eq!(frame.rows[1], StackedRow::Cumulative(vec![3.0]));
    }

    #[test]
    fn test_band_frame_indices() {
        assert_eq!(Band::new(2, 0).frame_indices(), (3, 1));
    }

    #[test]
    fn test_stacked_row_serialization() {
        let json = serde_json::to_value(StackedRow::PassThrough(vec![Some(1.0), None])).unwrap();
        assert_eq!(json["kind"], "pass_through");
        assert!(json["values"][1].is_null());
    }
}
