//! Reader for the results-section scrape.
//!
//! One row per trial with a posted results section; the completion date here
//! takes precedence over the protocol-level date during resolution.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::debug;

use euctr_model::{EudractNumber, PipelineError, Result};

use crate::parse::{HeaderLookup, normalize_cell, parse_date};

const TRIAL_ID: &str = "trial_id";
const RESULTS_COMPLETION: &str = "global_end_of_trial_date";

/// Read the results scrape into a per-trial completion-date map.
///
/// Rows without a completion date are skipped; should a trial somehow appear
/// twice, the later date wins, keeping the fold order-independent.
pub fn read_results_scrape(path: &Path) -> Result<BTreeMap<EudractNumber, NaiveDate>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|error| {
            PipelineError::DataIntegrity(format!("read {}: {error}", path.display()))
        })?;

    let headers = reader.headers().map_err(|error| {
        PipelineError::DataIntegrity(format!("read headers {}: {error}", path.display()))
    })?;
    let lookup = HeaderLookup::new(headers.iter());
    let trial_id_col = lookup.require(TRIAL_ID)?;
    let date_col = lookup.require(RESULTS_COMPLETION)?;

    let mut dates: BTreeMap<EudractNumber, NaiveDate> = BTreeMap::new();
    let mut row_count = 0usize;
    for (row_index, row) in reader.records().enumerate() {
        let row = row.map_err(|error| {
            PipelineError::DataIntegrity(format!(
                "{} row {}: {error}",
                path.display(),
                row_index + 2
            ))
        })?;
        row_count += 1;

        let trial_id = normalize_cell(row.get(trial_id_col).unwrap_or(""));
        if trial_id.is_empty() {
            return Err(PipelineError::DataIntegrity(format!(
                "{} row {}: empty {TRIAL_ID}",
                path.display(),
                row_index + 2
            )));
        }
        let Some(date) = parse_date(RESULTS_COMPLETION, row.get(date_col).unwrap_or(""))? else {
            continue;
        };

        dates
            .entry(EudractNumber::new(trial_id))
            .and_modify(|existing| {
                if date > *existing {
                    *existing = date;
                }
            })
            .or_insert(date);
    }

    debug!(
        source_file = %path.display(),
        row_count,
        trial_count = dates.len(),
        "results scrape loaded"
    );
    Ok(dates)
}
