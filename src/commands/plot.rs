//! Plot command implementation.
//!
//! The plot command:
//! 1. Reads series from JSON
//! 2. Normalizes them (sort, dedup, validate)
//! 3. Builds the shared timeline and aligns every series
//! 4. Stacks the aligned rows (if requested)
//! 5. Groups and ranks values over the time window
//! 6. Writes the report

use super::models::PlotArgs;
use crate::aggregator::{
    aggregate_by, calculate_value_distribution, group_shares, stack_plot_data, top_groups,
    TimeRange,
};
use crate::output::{write_report, Report};
use crate::parser::{normalize_series, read_series, NormalizeOptions};
use crate::timeline::build_plot_data;
use crate::utils::config::MAX_TOP_GROUPS;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the plot command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report that was written
///
/// # Errors
/// * Unreadable or malformed input
/// * Series that fail validation (non-finite values, empty keys)
/// * File write errors
pub fn execute_plot(args: &PlotArgs) -> Result<Report> {
    let start_time = Instant::now();

    info!("Step 1/6: Reading series from {}...", args.input.display());
    let raw = read_series(&args.input)
        .with_context(|| format!("Failed to read series from {}", args.input.display()))?;

    info!("Step 2/6: Normalizing {} series...", raw.len());
    let mut options = NormalizeOptions::new().with_timestamp_scale(args.timestamp_scale);
    if let Some(instance) = &args.instance {
        options = options.with_instance(instance.clone());
    }
    let series = normalize_series(raw, &options).context("Series failed validation")?;

    info!("Step 3/6: Building timeline...");
    let plot = build_plot_data(&series).context("Failed to align series")?;
    debug!(
        "Timeline has {} timestamps across {} series",
        plot.timeline.len(),
        plot.series.len()
    );

    if let Some(bad) = args.omit.iter().find(|&&i| i >= plot.series.len()) {
        anyhow::bail!(
            "--omit index {} is out of range ({} series after normalization)",
            bad,
            plot.series.len()
        );
    }

    let stacked = if args.stack {
        info!("Step 4/6: Stacking {} rows...", plot.series.len());
        let frame = stack_plot_data(&plot, |i| args.omit.contains(&i))
            .context("Failed to stack series")?;
        Some(frame)
    } else {
        info!("Step 4/6: Skipping stacking (not requested)");
        None
    };

    info!("Step 5/6: Ranking groups by {:?}...", args.group_by);
    let range = time_range(args)?;
    let groups = aggregate_by(&series, range, args.group_by).context("Failed to group series")?;

    let distribution = calculate_value_distribution(&groups);
    info!("Value distribution: {}", distribution.summary());

    for (i, share) in group_shares(top_groups(&groups, 3), distribution.total_value)
        .iter()
        .enumerate()
    {
        debug!(
            "  {}. {} = {:.1} ({:.1}%)",
            i + 1,
            share.key,
            share.total_value,
            share.percentage
        );
    }

    let kept = top_groups(&groups, args.top).to_vec();

    info!("Step 6/6: Writing report...");
    let mut report = Report::new(plot, kept).with_range(range);
    if let Some(frame) = stacked {
        report = report.with_stacked(frame);
    }

    write_report(&report, &args.output).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output.display());

    if args.print_summary {
        print_summary(&report, distribution.total_value);
    }

    info!(
        "Plot completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Validate plot arguments
///
/// **Public** - can be called before execute_plot for early validation
pub fn validate_args(args: &PlotArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.start.is_some() != args.end.is_some() {
        anyhow::bail!("--start and --end must be given together");
    }

    time_range(args)?;

    if args.top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top > MAX_TOP_GROUPS {
        anyhow::bail!("top is too large (max {})", MAX_TOP_GROUPS);
    }

    if args.timestamp_scale <= 0 {
        anyhow::bail!("timestamp scale must be positive");
    }

    Ok(())
}

fn time_range(args: &PlotArgs) -> Result<Option<TimeRange>> {
    match (args.start, args.end) {
        (Some(start), Some(end)) => Ok(Some(TimeRange::new(start, end)?)),
        _ => Ok(None),
    }
}

fn print_summary(report: &Report, grand_total: f64) {
    println!("\n{}", "=".repeat(80));
    println!("PLOT SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Series:     {}", report.series_count);
    println!("Timestamps: {}", report.plot.timeline.len());
    if let (Some(first), Some(last)) = (report.plot.timeline.first(), report.plot.timeline.last()) {
        println!("Span:       {} .. {}", first, last);
    }
    if let Some(frame) = &report.stacked {
        println!("Bands:      {}", frame.bands.len());
    }
    println!("\nTop groups:");
    for (i, share) in group_shares(top_groups(&report.groups, 10), grand_total)
        .iter()
        .enumerate()
    {
        println!(
            "  {:>2}. {:<40} {:>12.1} {:>6.1}%",
            i + 1,
            share.key,
            share.total_value,
            share.percentage
        );
    }
    println!("{}", "=".repeat(80));
}
