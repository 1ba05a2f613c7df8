//! Timeline Stack
//!
//! Aligns independently, irregularly sampled series onto one shared
//! timeline, ranks groups of series over a time window, and builds
//! cumulative stacked layers for area charts.
//!
//! This crate provides the core implementation for the
//! `timeline-stack` CLI tool.
//!
//! ## Getting Started
//!
//! ```
//! use timeline_stack::parser::{normalize_series, NormalizeOptions, RawSeries};
//! use timeline_stack::timeline::build_plot_data;
//! use timeline_stack::aggregator::stack_plot_data;
//!
//! let series = vec![
//!     RawSeries::new("A", None).with_samples([(1, 5.0), (2, 7.0)]),
//!     RawSeries::new("B", None).with_samples([(3, 9.0), (2, 3.0)]),
//! ];
//! let series = normalize_series(series, &NormalizeOptions::default()).unwrap();
//! let plot = build_plot_data(&series).unwrap();
//! assert_eq!(plot.timeline, vec![1, 2, 3]);
//!
//! let frame = stack_plot_data(&plot, |_| false).unwrap();
//! assert_eq!(frame.bands.len(), 1);
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod timeline;
pub mod utils;
