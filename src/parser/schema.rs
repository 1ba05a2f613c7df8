//! Input schema for raw series.
//!
//! Field names follow our own snake_case form, with aliases for the
//! upstream collector's JSON (`SQLDigest`, `PlanDigest`, `UnorderedValues`, ...)
//! so its responses can be fed in unchanged.

use serde::{Deserialize, Serialize};

/// A single measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    #[serde(alias = "Timestamp")]
    pub timestamp: i64,

    #[serde(alias = "CPUInMS")]
    pub value: f64,
}

impl RawSample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// One series, identified by a two-level key
///
/// Samples may arrive unsorted and with repeated timestamps;
/// see [`normalize_series`](super::normalize::normalize_series).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    /// Primary digest (e.g. normalized query)
    #[serde(alias = "SQLDigest", alias = "primaryKey")]
    pub primary_key: String,

    /// Secondary digest (e.g. execution plan), absent for some series
    #[serde(default, alias = "PlanDigest", alias = "secondaryKey")]
    pub secondary_key: Option<String>,

    /// Source instance the series was collected from
    #[serde(default, alias = "Instance", skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    #[serde(default, alias = "UnorderedValues")]
    pub samples: Vec<RawSample>,
}

impl RawSeries {
    pub fn new(primary_key: impl Into<String>, secondary_key: Option<&str>) -> Self {
        Self {
            primary_key: primary_key.into(),
            secondary_key: secondary_key.map(str::to_string),
            instance: None,
            samples: Vec::new(),
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_samples(mut self, samples: impl IntoIterator<Item = (i64, f64)>) -> Self {
        self.samples = samples
            .into_iter()
            .map(|(timestamp, value)| RawSample::new(timestamp, value))
            .collect();
        self
    }

    /// Human-readable identifier for logs and error messages
    pub fn label(&self) -> String {
        match &self.secondary_key {
            Some(secondary) => format!("{}:{}", self.primary_key, secondary),
            None => self.primary_key.clone(),
        }
    }

    /// Timestamps in sample order
    pub fn timestamps(&self) -> Vec<i64> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    pub fn value_sum(&self) -> f64 {
        self.samples.iter().map(|s| s.value).sum()
    }
}
