use crate::output::read_report;
use crate::parser::{list_instances, read_series};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Series: {}", report.series_count);
    println!("  Timestamps: {}", report.plot.timeline.len());
    println!("  Groups: {}", report.groups.len());
    println!("  Stacked: {}", if report.stacked.is_some() { "yes" } else { "no" });

    Ok(())
}

/// Print the instance names found in a series file
pub fn print_instances(input: &Path) -> Result<Vec<String>> {
    let series = read_series(input)
        .with_context(|| format!("Failed to read series from {}", input.display()))?;

    let instances = list_instances(&series);
    for instance in &instances {
        println!("{}", instance);
    }

    Ok(instances)
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Timeline Stack Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string       - RFC 3339 timestamp");
        println!("  series_count: number       - Series after normalization");
        println!("  range: object?             - Inclusive window {{start, end}}");
        println!("  plot: object");
        println!("    timeline: number[]       - Strictly increasing timestamps");
        println!("    series: array            - Aligned series, sorted by key");
        println!("      primary_key: string");
        println!("      secondary_key: string?");
        println!("      values: (number|null)[] - null where no sample exists");
        println!("  stacked: object?");
        println!("    timeline: number[]");
        println!("    rows: array              - {{kind: cumulative|pass_through, values}}");
        println!("    bands: array             - {{top, bottom}} row indexes");
        println!("  groups: array              - Ranked by total, highest first");
        println!("    key: string");
        println!("    total_value: number");
        println!("    values_by_timestamp: object");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Timeline Stack v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Aligns, groups and stacks sparse time series for layered charts.");
}
