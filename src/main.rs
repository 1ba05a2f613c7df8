//! Timeline Stack CLI
//!
//! Reads a snapshot of series as JSON and writes a report with the
//! aligned plot data, ranked groups and, optionally, stacked layers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use timeline_stack::aggregator::GroupBy;
use timeline_stack::commands::{
    display_schema, display_version, execute_plot, print_instances, validate_args,
    validate_report_file, PlotArgs,
};
use timeline_stack::utils::config::{DEFAULT_TOP_GROUPS, SECONDS_TO_MILLIS};

/// Timeline Stack - align, group and stack sparse time series
#[derive(Parser, Debug)]
#[command(name = "timeline-stack")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Align series and write a plot report
    Plot {
        /// JSON file holding an array of series
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Include cumulative stacked layers
        #[arg(long)]
        stack: bool,

        /// Series index to leave out of the stack (repeatable)
        #[arg(long)]
        omit: Vec<usize>,

        /// Start of the grouping window (inclusive)
        #[arg(long, allow_hyphen_values = true)]
        start: Option<i64>,

        /// End of the grouping window (inclusive)
        #[arg(long, allow_hyphen_values = true)]
        end: Option<i64>,

        /// How series are grouped for ranking
        #[arg(long, value_enum, default_value_t = GroupBy::Primary)]
        group_by: GroupBy,

        /// Number of ranked groups to keep
        #[arg(long, default_value_t = DEFAULT_TOP_GROUPS)]
        top: usize,

        /// Input timestamps are seconds; convert to milliseconds
        #[arg(long)]
        seconds: bool,

        /// Only use series from this instance
        #[arg(long, env = "TIMELINE_STACK_INSTANCE")]
        instance: Option<String>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// List instances present in a series file
    Instances {
        /// JSON file holding an array of series
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Plot {
            input,
            output,
            stack,
            omit,
            start,
            end,
            group_by,
            top,
            seconds,
            instance,
            summary,
        } => {
            let args = PlotArgs {
                input,
                output,
                stack,
                omit,
                start,
                end,
                group_by,
                top,
                timestamp_scale: if seconds { SECONDS_TO_MILLIS } else { 1 },
                instance,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_plot(&args)?;
        }

        Commands::Instances { input } => {
            print_instances(&input)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
