//! Pre-processing of raw series before alignment.
//!
//! Series arrive in arbitrary order with unsorted, possibly repeated
//! samples. Merging and alignment expect each series sorted ascending
//! and deduplicated, and the series themselves ordered by key.

use super::schema::RawSeries;
use crate::utils::error::ValidationError;
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Options controlling [`normalize_series`]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOptions {
    /// Keep only series collected from this instance
    pub instance: Option<String>,

    /// Multiplier applied to every timestamp (1 keeps them as-is)
    pub timestamp_scale: i64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            instance: None,
            timestamp_scale: 1,
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_timestamp_scale(mut self, scale: i64) -> Self {
        self.timestamp_scale = scale;
        self
    }
}

/// Sort, deduplicate and validate a batch of series
///
/// **Public** - the entry point every caller goes through before
/// building a timeline
///
/// # Returns
/// Series ordered by primary key then secondary key (absent sorts as
/// empty), each with samples strictly increasing by timestamp. When a
/// timestamp repeats, the first sample in input order wins.
///
/// # Errors
/// * `ValidationError::EmptyPrimaryKey` - a series has no primary key
/// * `ValidationError::NonFiniteValue` - a sample is NaN or infinite
/// * `ValidationError::TimestampOverflow` - scaling overflowed `i64`
pub fn normalize_series(
    series: Vec<RawSeries>,
    options: &NormalizeOptions,
) -> Result<Vec<RawSeries>, ValidationError> {
    let input_count = series.len();

    let mut normalized = Vec::with_capacity(input_count);
    for mut s in series {
        if let Some(instance) = &options.instance {
            if s.instance.as_deref() != Some(instance.as_str()) {
                continue;
            }
        }

        validate_series(&s)?;

        if s.secondary_key.as_deref() == Some("") {
            s.secondary_key = None;
        }

        if options.timestamp_scale != 1 {
            scale_timestamps(&mut s, options.timestamp_scale)?;
        }

        // Stable sort keeps the first occurrence ahead of its duplicates
        s.samples.sort_by_key(|sample| sample.timestamp);
        s.samples.dedup_by_key(|sample| sample.timestamp);

        normalized.push(s);
    }

    normalized.sort_by(compare_keys);

    debug!(
        "Normalized {} of {} series ({} samples)",
        normalized.len(),
        input_count,
        normalized.iter().map(|s| s.samples.len()).sum::<usize>()
    );

    Ok(normalized)
}

/// Ordering used for plot series: primary key, then secondary key
pub fn compare_keys(a: &RawSeries, b: &RawSeries) -> Ordering {
    a.primary_key.cmp(&b.primary_key).then_with(|| {
        let sa = a.secondary_key.as_deref().unwrap_or("");
        let sb = b.secondary_key.as_deref().unwrap_or("");
        sa.cmp(sb)
    })
}

/// Sorted, deduplicated instance names present in the input
pub fn list_instances(series: &[RawSeries]) -> Vec<String> {
    series
        .iter()
        .filter_map(|s| s.instance.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn validate_series(series: &RawSeries) -> Result<(), ValidationError> {
    if series.primary_key.is_empty() {
        return Err(ValidationError::EmptyPrimaryKey);
    }

    if let Some(bad) = series.samples.iter().find(|s| !s.value.is_finite()) {
        return Err(ValidationError::NonFiniteValue {
            series: series.label(),
            timestamp: bad.timestamp,
            value: bad.value,
        });
    }

    Ok(())
}

fn scale_timestamps(series: &mut RawSeries, scale: i64) -> Result<(), ValidationError> {
    for sample in &mut series.samples {
        sample.timestamp = sample
            .timestamp
            .checked_mul(scale)
            .ok_or(ValidationError::TimestampOverflow {
                timestamp: sample.timestamp,
                scale,
            })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::RawSample;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sorts_and_dedups_first_wins() {
        let series = vec![RawSeries::new("q", None).with_samples([(3, 1.0), (1, 2.0), (3, 9.0), (2, 4.0)])];

        let out = normalize_series(series, &NormalizeOptions::default()).unwrap();

        assert_eq!(
            out[0].samples,
            vec![RawSample::new(1, 2.0), RawSample::new(2, 4.0), RawSample::new(3, 1.0)]
        );
    }

    #[test]
    fn test_orders_series_by_keys() {
        let series = vec![
            RawSeries::new("b", None),
            RawSeries::new("a", Some("z")),
            RawSeries::new("a", None),
            RawSeries::new("a", Some("m")),
        ];

        let out = normalize_series(series, &NormalizeOptions::default()).unwrap();
        let labels: Vec<String> = out.iter().map(RawSeries::label).collect();

        assert_eq!(labels, vec!["a", "a:m", "a:z", "b"]);
    }

    #[test]
    fn test_empty_secondary_key_becomes_absent() {
        let series = vec![RawSeries::new("a", Some(""))];
        let out = normalize_series(series, &NormalizeOptions::default()).unwrap();
        assert_eq!(out[0].secondary_key, None);
    }

    #[test]
    fn test_rejects_non_finite() {
        let series = vec![RawSeries::new("q", None).with_samples([(1, f64::NAN)])];
        let err = normalize_series(series, &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, ValidationError::NonFiniteValue { timestamp: 1, .. }));
    }

    #[test]
    fn test_negative_and_zero_values_are_kept() {
        let series = vec![RawSeries::new("q", None).with_samples([(1, -2.0), (2, 0.0)])];
        let out = normalize_series(series, &NormalizeOptions::default()).unwrap();
        assert_eq!(out[0].samples.len(), 2);
    }

    #[test]
    fn test_rejects_empty_primary_key() {
        let series = vec![RawSeries::new("", None)];
        assert_eq!(
            normalize_series(series, &NormalizeOptions::default()),
            Err(ValidationError::EmptyPrimaryKey)
        );
    }

    #[test]
    fn test_instance_filter_and_scale() {
        let series = vec![
            RawSeries::new("q", None).with_instance("tidb-1").with_samples([(2, 1.0)]),
            RawSeries::new("q", None).with_instance("tidb-2").with_samples([(5, 1.0)]),
        ];
        let options = NormalizeOptions::new()
            .with_instance("tidb-1")
            .with_timestamp_scale(1000);

        let out = normalize_series(series, &options).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].samples[0].timestamp, 2000);
    }

    #[test]
    fn test_scale_overflow() {
        let series = vec![RawSeries::new("q", None).with_samples([(i64::MAX, 1.0)])];
        let options = NormalizeOptions::new().with_timestamp_scale(2);
        assert!(matches!(
            normalize_series(series, &options),
            Err(ValidationError::TimestampOverflow { .. })
        ));
    }

    #[test]
    fn test_list_instances() {
        let series = vec![
            RawSeries::new("q", None).with_instance("tikv-2"),
            RawSeries::new("q", None),
            RawSeries::new("r", None).with_instance("tidb-1"),
            RawSeries::new("s", None).with_instance("tikv-2"),
        ];
        assert_eq!(list_instances(&series), vec!["tidb-1", "tikv-2"]);
    }

    #[test]
    fn test_empty_input() {
        let out = normalize_series(Vec::new(), &NormalizeOptions::default()).unwrap();
        assert!(out.is_empty());
    }
}
