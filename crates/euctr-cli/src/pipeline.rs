//! Study processing pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Read the protocol dump and results scrape into typed records
//! 2. **Aggregate**: Roll country protocols up into per-trial status summaries
//! 3. **Resolve**: Derive one canonical completion date per trial
//! 4. **Classify**: Assign inclusion categories and the eligibility flag
//! 5. **Sample**: Draw the seeded primary sample and replacement pool
//! 6. **Report**: Write the population and sample tables plus the config snapshot
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, info_span};

use euctr_core::{
    classify_trials, draw_sample_plan, never_started_trials, resolve_dates, summarize_trials,
};
use euctr_ingest::{read_protocol_dump, read_results_scrape};
use euctr_model::{EudractNumber, InclusionRecord, ProtocolRecord, SamplePlan, StudyConfig};
use euctr_report::write_outputs;

use crate::types::StudyResult;

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    pub protocol_records: Vec<ProtocolRecord>,
    pub results_dates: BTreeMap<EudractNumber, NaiveDate>,
}

/// Read both source tables into typed records.
pub fn ingest(protocol_dump: &Path, results_scrape: &Path) -> Result<IngestResult> {
    let ingest_span = info_span!("ingest");
    let _ingest_guard = ingest_span.enter();
    let start = Instant::now();

    let protocol_records = read_protocol_dump(protocol_dump)
        .with_context(|| format!("read protocol dump {}", protocol_dump.display()))?;
    let results_dates = read_results_scrape(results_scrape)
        .with_context(|| format!("read results scrape {}", results_scrape.display()))?;

    info!(
        protocol_rows = protocol_records.len(),
        results_trials = results_dates.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        protocol_records,
        results_dates,
    })
}

/// Aggregate, resolve, and classify: the full trial universe in, one
/// inclusion record per trial out.
pub fn resolve(input: &IngestResult, config: &StudyConfig) -> Result<Vec<InclusionRecord>> {
    let resolve_span = info_span!("resolve");
    let _resolve_guard = resolve_span.enter();
    let start = Instant::now();

    let summaries =
        summarize_trials(&input.protocol_records).context("aggregate protocol rows")?;
    let never_started = never_started_trials(&summaries);
    debug!(
        trial_count = summaries.len(),
        never_started_count = never_started.len(),
        "protocol rows aggregated"
    );

    let resolved = resolve_dates(
        &input.protocol_records,
        &input.results_dates,
        &never_started,
        config,
    );
    let inclusions = classify_trials(&summaries, &resolved, config);

    info!(
        trial_count = inclusions.len(),
        eligible_count = inclusions.iter().filter(|record| record.eligible).count(),
        duration_ms = start.elapsed().as_millis(),
        "resolution complete"
    );
    Ok(inclusions)
}

/// Draw the primary sample and replacement pool from the eligible population.
pub fn sample(inclusions: &[InclusionRecord], config: &StudyConfig) -> Result<SamplePlan> {
    let sample_span = info_span!("sample");
    let _sample_guard = sample_span.enter();
    let start = Instant::now();

    let plan = draw_sample_plan(inclusions, config).context("draw sample plan")?;

    info!(
        primary_count = plan.primary.len(),
        replacement_count = plan.replacement.len(),
        duration_ms = start.elapsed().as_millis(),
        "sampling complete"
    );
    Ok(plan)
}

/// Inputs for a full study run.
pub struct RunInputs<'a> {
    pub protocol_dump: &'a Path,
    pub results_scrape: &'a Path,
    pub output_dir: PathBuf,
    pub config: StudyConfig,
    pub dry_run: bool,
}

/// Run the full pipeline and, unless this is a dry run, write the outputs.
pub fn run_study(inputs: RunInputs<'_>) -> Result<StudyResult> {
    let run_start = Instant::now();

    let ingested = ingest(inputs.protocol_dump, inputs.results_scrape)?;
    let inclusions = resolve(&ingested, &inputs.config)?;
    let plan = sample(&inclusions, &inputs.config)?;

    let mut category_counts = BTreeMap::new();
    for record in &inclusions {
        *category_counts.entry(record.exclusion_status).or_insert(0) += 1;
    }
    let eligible_count = inclusions.iter().filter(|record| record.eligible).count();
    let eligible_inferred_count = inclusions
        .iter()
        .filter(|record| record.eligible && record.inferred)
        .count();

    let outputs = if inputs.dry_run {
        info!("output skipped (dry run)");
        None
    } else {
        Some(
            write_outputs(&inputs.output_dir, &inclusions, &plan, &inputs.config)
                .context("write outputs")?,
        )
    };

    info!(
        trial_count = inclusions.len(),
        eligible_count,
        duration_ms = run_start.elapsed().as_millis(),
        "study run complete"
    );
    Ok(StudyResult {
        output_dir: (!inputs.dry_run).then_some(inputs.output_dir),
        protocol_row_count: ingested.protocol_records.len(),
        trial_count: inclusions.len(),
        category_counts,
        eligible_count,
        eligible_inferred_count,
        primary_sample_count: plan.primary.len(),
        replacement_sample_count: plan.replacement.len(),
        outputs,
    })
}
