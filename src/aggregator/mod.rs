//! Aggregation of aligned series into render-ready structures.
//!
//! This module transforms series into:
//! - Ranked per-group buckets over a time window (grouped/stacked bars)
//! - Cumulative stacked layers with shading bands (stacked areas)
//! - Distribution statistics over group totals

pub mod stack_builder;
pub mod metrics;

// Re-export main types and functions
pub use stack_builder::{stack, stack_plot_data, Band, StackedFrame, StackedRow};
pub use metrics::{
    aggregate, aggregate_by, calculate_value_distribution, group_shares, top_groups, GroupBucket,
    GroupBy, GroupShare, TimeRange, ValueDistribution,
};
