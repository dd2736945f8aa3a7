//! Command implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use euctr_cli::pipeline::{RunInputs, run_study};
use euctr_cli::types::StudyResult;
use euctr_model::StudyConfig;

use crate::cli::{ConfigArgs, RunArgs};

pub fn run_study_command(args: &RunArgs) -> Result<StudyResult> {
    let config = load_config(args.config.as_deref())?;
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        args.protocol_dump
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("output")
    });

    run_study(RunInputs {
        protocol_dump: &args.protocol_dump,
        results_scrape: &args.results_scrape,
        output_dir,
        config,
        dry_run: args.dry_run,
    })
}

pub fn run_config_command(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let json = serde_json::to_string_pretty(&config).context("serialize study config")?;
    println!("{json}");
    Ok(())
}

/// Load a versioned study configuration, falling back to the documented
/// study constants.
fn load_config(path: Option<&Path>) -> Result<StudyConfig> {
    let Some(path) = path else {
        return Ok(StudyConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse config {}", path.display()))
}
