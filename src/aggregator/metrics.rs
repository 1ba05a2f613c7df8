//! Group aggregation and ranking over a time window.
//!
//! Samples are summed per group key and exact timestamp (no resampling),
//! and groups are ranked by their total. The ranked order is what grouped
//! or stacked bar charts draw, so it doubles as z-order.

use crate::parser::schema::RawSeries;
use crate::utils::config::{CONCENTRATION_THRESHOLD_PERCENT, SERIES_KEY_SEPARATOR};
use crate::utils::error::ValidationError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Closed time window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: i64, end: i64) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Both bounds are inclusive
    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// How series are assigned to groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GroupBy {
    /// All series sharing a primary key form one group
    #[default]
    Primary,

    /// Every (primary, secondary) pair is its own group
    Series,
}

impl GroupBy {
    /// Group key for a series
    ///
    /// Per-series keys escape `\` and the separator inside each part, so
    /// distinct (primary, secondary) pairs never share a key.
    pub fn key_of(&self, series: &RawSeries) -> String {
        match (self, &series.secondary_key) {
            (GroupBy::Primary, _) => series.primary_key.clone(),
            (GroupBy::Series, Some(secondary)) => format!(
                "{}{}{}",
                escape_key_part(&series.primary_key),
                SERIES_KEY_SEPARATOR,
                escape_key_part(secondary)
            ),
            (GroupBy::Series, None) => escape_key_part(&series.primary_key),
        }
    }
}

fn escape_key_part(part: &str) -> String {
    part.replace('\\', "\\\\")
        .replace(SERIES_KEY_SEPARATOR, &format!("\\{}", SERIES_KEY_SEPARATOR))
}

/// Summed values of one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBucket {
    pub key: String,

    /// Sum of every retained sample, used for ranking
    pub total_value: f64,

    /// Only timestamps with at least one retained sample appear here
    pub values_by_timestamp: BTreeMap<i64, f64>,
}

impl GroupBucket {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            total_value: 0.0,
            values_by_timestamp: BTreeMap::new(),
        }
    }

    /// `(timestamp, value)` pairs in ascending timestamp order
    pub fn points(&self) -> Vec<(i64, f64)> {
        self.values_by_timestamp.iter().map(|(&t, &v)| (t, v)).collect()
    }
}

/// Bucket and rank series by group key
///
/// **Public** - main entry point for grouped views
///
/// # Arguments
/// * `series` - input series, in the order ties should resolve
/// * `range` - when set, samples outside `[start, end]` are dropped
/// * `key_of` - group key for a series; keys are opaque
///
/// # Returns
/// Buckets sorted by descending total. Equal totals keep the order in
/// which their groups first appeared in `series`. A group whose samples
/// were all filtered out is still listed, with a zero total.
///
/// # Errors
/// * `ValidationError::NonFiniteValue` - a sample is NaN or infinite
/// * `ValidationError::SumOverflow` - a bucket or group total overflows
pub fn aggregate<F>(
    series: &[RawSeries],
    range: Option<TimeRange>,
    key_of: F,
) -> Result<Vec<GroupBucket>, ValidationError>
where
    F: Fn(&RawSeries) -> String,
{
    let mut buckets: Vec<GroupBucket> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut retained = 0usize;

    for s in series {
        let key = key_of(s);
        let index = *index_by_key.entry(key.clone()).or_insert_with(|| {
            buckets.push(GroupBucket::new(key));
            buckets.len() - 1
        });
        let bucket = &mut buckets[index];

        for sample in &s.samples {
            if !sample.value.is_finite() {
                return Err(ValidationError::NonFiniteValue {
                    series: s.label(),
                    timestamp: sample.timestamp,
                    value: sample.value,
                });
            }

            if range.is_some_and(|r| !r.contains(sample.timestamp)) {
                continue;
            }

            let slot = bucket
                .values_by_timestamp
                .entry(sample.timestamp)
                .or_insert(0.0);
            *slot += sample.value;
            if !slot.is_finite() {
                return Err(ValidationError::SumOverflow {
                    context: format!("group {} at timestamp {}", bucket.key, sample.timestamp),
                });
            }

            bucket.total_value += sample.value;
            if !bucket.total_value.is_finite() {
                return Err(ValidationError::SumOverflow {
                    context: format!("group {} total", bucket.key),
                });
            }
            retained += 1;
        }
    }

    // sort_by is stable: ties stay in first-appearance order
    buckets.sort_by(|a, b| {
        b.total_value
            .partial_cmp(&a.total_value)
            .unwrap_or(Ordering::Equal)
    });

    debug!(
        "Aggregated {} samples from {} series into {} groups",
        retained,
        series.len(),
        buckets.len()
    );

    Ok(buckets)
}

/// [`aggregate`] with one of the built-in groupings
pub fn aggregate_by(
    series: &[RawSeries],
    range: Option<TimeRange>,
    group_by: GroupBy,
) -> Result<Vec<GroupBucket>, ValidationError> {
    aggregate(series, range, |s| group_by.key_of(s))
}

/// First `n` groups of a ranked list
pub fn top_groups(buckets: &[GroupBucket], n: usize) -> &[GroupBucket] {
    &buckets[..n.min(buckets.len())]
}

/// A group's part of the overall total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupShare {
    pub key: String,
    pub total_value: f64,
    pub percentage: f64,
}

/// Percentage share of each group, in ranked order
pub fn group_shares(buckets: &[GroupBucket], grand_total: f64) -> Vec<GroupShare> {
    buckets
        .iter()
        .map(|bucket| GroupShare {
            key: bucket.key.clone(),
            total_value: bucket.total_value,
            percentage: if grand_total > 0.0 {
                bucket.total_value / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Calculate how the total is spread across ranked groups
///
/// **Public** - summary statistics for logs and reports
pub fn calculate_value_distribution(buckets: &[GroupBucket]) -> ValueDistribution {
    if buckets.is_empty() {
        return ValueDistribution::default();
    }

    let total: f64 = buckets.iter().map(|b| b.total_value).sum();
    let count = buckets.len();

    let mut totals: Vec<f64> = buckets.iter().map(|b| b.total_value).collect();
    totals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let median = totals[totals.len() / 2];

    // Buckets arrive ranked, so the head is the top 10%
    let top_count = (count as f64 * 0.1).ceil() as usize;
    let top_value: f64 = buckets.iter().take(top_count).map(|b| b.total_value).sum();

    ValueDistribution {
        total_value: total,
        group_count: count,
        mean_value_per_group: total / count as f64,
        median_value_per_group: median,
        top_10_percent_value: top_value,
        top_10_percent_percentage: if total > 0.0 {
            top_value / total * 100.0
        } else {
            0.0
        },
    }
}

/// Distribution of totals across groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueDistribution {
    pub total_value: f64,
    pub group_count: usize,
    pub mean_value_per_group: f64,
    pub median_value_per_group: f64,

    /// Value held by the top 10% of groups
    pub top_10_percent_value: f64,
    pub top_10_percent_percentage: f64,
}

impl ValueDistribution {
    /// True if the top 10% of groups hold more than 80% of the total
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_10_percent_percentage > CONCENTRATION_THRESHOLD_PERCENT
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {:.1} | Groups: {} | Mean: {:.1} | Median: {:.1} | Top 10%: {:.1}%",
            self.total_value,
            self.group_count,
            self.mean_value_per_group,
            self.median_value_per_group,
            self.top_10_percent_percentage
        )
    }
}
