//! Project a series onto a merged timeline.

use super::{validate_strictly_increasing, AlignedSeries};
use crate::parser::schema::RawSeries;
use crate::utils::error::ValidationError;
use log::warn;

/// Align one series to the timeline
///
/// **Public** - main entry point for alignment
///
/// # Arguments
/// * `series` - samples sorted ascending, no repeated timestamps
/// * `timeline` - strictly increasing superset of the series' timestamps
///
/// # Returns
/// One slot per timeline entry: the sample value where the series has a
/// sample at that timestamp, `None` otherwise.
///
/// # Errors
/// * `ValidationError::UnsortedTimestamps` / `DuplicateTimestamp` - the
///   series was not normalized
/// * `ValidationError::NonFiniteValue` - a sample is NaN or infinite
/// * `ValidationError::UnsortedTimestamps` / `DuplicateTimestamp` with
///   context `timeline` - the timeline itself is malformed
pub fn align(series: &RawSeries, timeline: &[i64]) -> Result<AlignedSeries, ValidationError> {
    validate_strictly_increasing(timeline.iter().copied(), "timeline")?;
    check_series(series)?;
    Ok(project(series, timeline))
}

/// Check that a series satisfies the alignment preconditions
pub(crate) fn check_series(series: &RawSeries) -> Result<(), ValidationError> {
    validate_strictly_increasing(
        series.samples.iter().map(|s| s.timestamp),
        &format!("series {}", series.label()),
    )?;

    if let Some(bad) = series.samples.iter().find(|s| !s.value.is_finite()) {
        return Err(ValidationError::NonFiniteValue {
            series: series.label(),
            timestamp: bad.timestamp,
            value: bad.value,
        });
    }

    Ok(())
}

/// Two-pointer scan over timeline and samples; both only move forward
///
/// The timeline must already be strictly increasing.
pub(crate) fn project(series: &RawSeries, timeline: &[i64]) -> AlignedSeries {
    let samples = &series.samples;
    let mut values = vec![None; timeline.len()];
    let mut ptr = 0;
    let mut placed = 0;

    for (slot, &ts) in values.iter_mut().zip(timeline) {
        // Only reachable when the timeline is not a superset of the series
        while ptr < samples.len() && samples[ptr].timestamp < ts {
            ptr += 1;
        }

        if ptr == samples.len() {
            break;
        }

        if samples[ptr].timestamp == ts {
            *slot = Some(samples[ptr].value);
            ptr += 1;
            placed += 1;
        }
    }

    if placed < samples.len() {
        warn!(
            "Series {}: {} samples have no slot in the timeline and were skipped",
            series.label(),
            samples.len() - placed
        );
    }

    AlignedSeries {
        primary_key: series.primary_key.clone(),
        secondary_key: series.secondary_key.clone(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_align_fills_gaps() {
        let series = RawSeries::new("a", None).with_samples([(2, 7.0), (5, 1.0)]);
        let aligned = align(&series, &[1, 2, 3, 5, 8]).unwrap();
        assert_eq!(aligned.values, vec![None, Some(7.0), None, Some(1.0), None]);
    }

    #[test]
    fn test_align_empty_series_all_absent() {
        let series = RawSeries::new("a", None);
        let aligned = align(&series, &[1, 2, 3]).unwrap();
        assert_eq!(aligned.values, vec![None, None, None]);
    }

    #[test]
    fn test_align_empty_timeline() {
        let series = RawSeries::new("a", Some("p"));
        let aligned = align(&series, &[]).unwrap();
        assert!(aligned.values.is_empty());
        assert_eq!(aligned.secondary_key.as_deref(), Some("p"));
    }

    #[test]
    fn test_align_keeps_zero_distinct_from_absent() {
        let series = RawSeries::new("a", None).with_samples([(1, 0.0)]);
        let aligned = align(&series, &[1, 2]).unwrap();
        assert_eq!(aligned.values, vec![Some(0.0), None]);
    }

    #[test]
    fn test_align_skips_samples_missing_from_timeline() {
        let series = RawSeries::new("a", None).with_samples([(1, 1.0), (2, 2.0), (4, 4.0), (9, 9.0)]);
        let aligned = align(&series, &[2, 4]).unwrap();
        assert_eq!(aligned.values, vec![Some(2.0), Some(4.0)]);
    }

    #[test]
    fn test_align_rejects_unsorted_series() {
        let series = RawSeries::new("a", None).with_samples([(3, 1.0), (1, 1.0)]);
        let err = align(&series, &[1, 3]).unwrap_err();
        assert!(matches!(err, ValidationError::UnsortedTimestamps { .. }));
    }

    #[test]
    fn test_align_rejects_duplicate_timestamps() {
        let series = RawSeries::new("a", None).with_samples([(1, 1.0), (1, 2.0)]);
        assert!(matches!(
            align(&series, &[1]),
            Err(ValidationError::DuplicateTimestamp { timestamp: 1, .. })
        ));
    }

    #[test]
    fn test_align_rejects_unsorted_timeline() {
        let series = RawSeries::new("a", None).with_samples([(1, 1.0), (2, 2.0)]);
        let err = align(&series, &[2, 1]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsortedTimestamps {
                context: "timeline".to_string(),
                index: 1,
                previous: 2,
                current: 1,
            }
        );
    }

    #[test]
    fn test_align_rejects_duplicate_timeline_entry() {
        let series = RawSeries::new("a", None).with_samples([(1, 1.0)]);
        assert!(matches!(
            align(&series, &[1, 1]),
            Err(ValidationError::DuplicateTimestamp { timestamp: 1, .. })
        ));
    }

    #[test]
    fn test_align_rejects_infinite_value() {
        let series = RawSeries::new("a", None).with_samples([(1, f64::INFINITY)]);
        assert!(matches!(
            align(&series, &[1]),
            Err(ValidationError::NonFiniteValue { .. })
        ));
    }
}
