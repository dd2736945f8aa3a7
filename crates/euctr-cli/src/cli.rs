//! CLI argument definitions for the EUCTR pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "euctr-pipeline",
    version,
    about = "EUCTR reporting-study pipeline - resolve completion dates and draw the review sample",
    long_about = "Process an EUCTR protocol dump into a de-duplicated analysis population\n\
                  with one resolved completion date per trial, then draw the seeded\n\
                  primary sample and replacement pool for manual review.\n\n\
                  All constants affecting reproducibility (plausibility window, cutoff,\n\
                  sample sizes, seeds) live in the study configuration; version the JSON\n\
                  snapshot written next to the outputs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the population and sample tables.
    Run(RunArgs),

    /// Print the effective study configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the protocol dump CSV (one row per country protocol).
    #[arg(value_name = "PROTOCOL_DUMP")]
    pub protocol_dump: PathBuf,

    /// Path to the results-section scrape CSV.
    #[arg(value_name = "RESULTS_SCRAPE")]
    pub results_scrape: PathBuf,

    /// Output directory for generated tables (default: <PROTOCOL_DUMP dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Study configuration JSON (default: the documented study constants).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Resolve and classify without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// Study configuration JSON to echo back (default: built-in constants).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
