//! Result types shared between the pipeline stages and the summary printer.

use std::collections::BTreeMap;
use std::path::PathBuf;

use euctr_model::ExclusionStatus;
use euctr_report::WrittenOutputs;

/// Everything a completed run reports back to the user.
#[derive(Debug)]
pub struct StudyResult {
    /// Where the output tables were written (None for dry runs).
    pub output_dir: Option<PathBuf>,
    /// Number of country-level protocol rows ingested.
    pub protocol_row_count: usize,
    /// Number of distinct trials in the universe.
    pub trial_count: usize,
    /// Trials per inclusion/exclusion category.
    pub category_counts: BTreeMap<ExclusionStatus, usize>,
    /// Trials whose final date fell before the cutoff.
    pub eligible_count: usize,
    /// Eligible trials whose final date had to be inferred.
    pub eligible_inferred_count: usize,
    pub primary_sample_count: usize,
    pub replacement_sample_count: usize,
    /// Output file paths (None for dry runs).
    pub outputs: Option<WrittenOutputs>,
}

impl StudyResult {
    pub fn category_count(&self, status: ExclusionStatus) -> usize {
        self.category_counts.get(&status).copied().unwrap_or(0)
    }
}
