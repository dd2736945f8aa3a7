//! Output writers for the study's flat tables.
//!
//! Three CSV tables (`eudract_number, final_date, inferred`) plus a JSON
//! snapshot of the configuration that produced them, so a run can be
//! reproduced from its output directory alone.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use tracing::info;

use euctr_model::{EudractNumber, InclusionRecord, SamplePlan, StudyConfig};

pub const FINAL_POPULATION_FILE: &str = "final_population.csv";
pub const PRIMARY_SAMPLE_FILE: &str = "primary_sample.csv";
pub const REPLACEMENT_SAMPLE_FILE: &str = "replacement_sample.csv";
pub const CONFIG_SNAPSHOT_FILE: &str = "study_config.json";

/// Paths of everything a run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub final_population: PathBuf,
    pub primary_sample: PathBuf,
    pub replacement_sample: PathBuf,
    pub config_snapshot: PathBuf,
}

/// Write the eligible population table, both sample tables, and the
/// configuration snapshot into `output_dir` (created if missing).
pub fn write_outputs(
    output_dir: &Path,
    inclusions: &[InclusionRecord],
    plan: &SamplePlan,
    config: &StudyConfig,
) -> Result<WrittenOutputs> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output dir {}", output_dir.display()))?;

    let by_id: BTreeMap<&EudractNumber, &InclusionRecord> = inclusions
        .iter()
        .map(|record| (&record.eudract_number, record))
        .collect();

    let eligible: Vec<&InclusionRecord> = inclusions
        .iter()
        .filter(|record| record.eligible)
        .collect();
    let final_population = output_dir.join(FINAL_POPULATION_FILE);
    write_population_table(&final_population, eligible.iter().copied())?;

    let primary_sample = output_dir.join(PRIMARY_SAMPLE_FILE);
    write_population_table(&primary_sample, resolve_ids(&plan.primary, &by_id))?;

    let replacement_sample = output_dir.join(REPLACEMENT_SAMPLE_FILE);
    write_population_table(&replacement_sample, resolve_ids(&plan.replacement, &by_id))?;

    let config_snapshot = output_dir.join(CONFIG_SNAPSHOT_FILE);
    let json = serde_json::to_string_pretty(config).context("serialize study config")?;
    fs::write(&config_snapshot, json)
        .with_context(|| format!("write {}", config_snapshot.display()))?;

    info!(
        output_dir = %output_dir.display(),
        eligible_count = eligible.len(),
        primary_count = plan.primary.len(),
        replacement_count = plan.replacement.len(),
        "outputs written"
    );
    Ok(WrittenOutputs {
        final_population,
        primary_sample,
        replacement_sample,
        config_snapshot,
    })
}

fn resolve_ids<'a>(
    ids: &'a [EudractNumber],
    by_id: &'a BTreeMap<&EudractNumber, &'a InclusionRecord>,
) -> impl Iterator<Item = &'a InclusionRecord> {
    ids.iter().filter_map(|id| by_id.get(id).copied())
}

/// One table: `eudract_number, final_date, inferred`, rows in input order.
fn write_population_table<'a, I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = &'a InclusionRecord>,
{
    let mut writer =
        Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(["eudract_number", "final_date", "inferred"])
        .context("write header")?;
    for record in records {
        let final_date = record
            .final_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writer
            .write_record([
                record.eudract_number.as_str(),
                final_date.as_str(),
                if record.inferred { "1" } else { "0" },
            ])
            .with_context(|| format!("write row for {}", record.eudract_number))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
