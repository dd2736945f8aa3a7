//! Completion-date resolution.
//!
//! Each trial gets exactly one canonical completion date: extracted from the
//! registry when possible, inferred from approval date plus declared duration
//! otherwise, unresolved when neither works. All per-trial reductions are
//! commutative max folds, so input row order never matters.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, Months, NaiveDate};
use tracing::debug;

use euctr_model::{EudractNumber, ProtocolRecord, ResolvedCompletion, StudyConfig};

/// Discard a date outside the plausibility window.
///
/// Both boundaries retain; dates strictly before the window start or strictly
/// after its end become absent. Registry completion dates before the registry
/// existed, or in the future, are entry errors rather than information.
pub fn apply_plausibility_window(
    date: Option<NaiveDate>,
    config: &StudyConfig,
) -> Option<NaiveDate> {
    date.filter(|value| config.is_plausible(*value))
}

/// Per-trial inputs collapsed from the protocol rows.
#[derive(Debug, Default, Clone, Copy)]
struct TrialDateInputs {
    protocol_completion: Option<NaiveDate>,
    latest_approval: Option<NaiveDate>,
    max_days: f64,
}

impl TrialDateInputs {
    fn absorb(&mut self, record: &ProtocolRecord) {
        self.protocol_completion = max_date(self.protocol_completion, record.protocol_completion);
        self.latest_approval = max_date(
            self.latest_approval,
            max_date(
                record.competent_authority_decision,
                record.ethics_committee_opinion,
            ),
        );
        let row_days = record
            .country_duration
            .total_days()
            .max(record.global_duration.total_days());
        if row_days > self.max_days {
            self.max_days = row_days;
        }
    }
}

fn max_date(left: Option<NaiveDate>, right: Option<NaiveDate>) -> Option<NaiveDate> {
    match (left, right) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Resolve one canonical completion date per started trial.
///
/// The results-section completion date takes precedence over the
/// protocol-level date; inference is only attempted when neither survives
/// the plausibility filter. Never-started trials are skipped entirely.
pub fn resolve_dates(
    records: &[ProtocolRecord],
    results_dates: &BTreeMap<EudractNumber, NaiveDate>,
    never_started: &BTreeSet<EudractNumber>,
    config: &StudyConfig,
) -> BTreeMap<EudractNumber, ResolvedCompletion> {
    let mut inputs: BTreeMap<EudractNumber, TrialDateInputs> = BTreeMap::new();
    for record in records {
        if never_started.contains(&record.eudract_number) {
            continue;
        }
        inputs
            .entry(record.eudract_number.clone())
            .or_default()
            .absorb(record);
    }

    let mut resolved = BTreeMap::new();
    let mut extracted_count = 0usize;
    let mut inferred_count = 0usize;
    for (trial_id, trial_inputs) in inputs {
        let completion = resolve_trial(
            &trial_inputs,
            results_dates.get(&trial_id).copied(),
            config,
        );
        match completion {
            ResolvedCompletion::Extracted(_) => extracted_count += 1,
            ResolvedCompletion::Inferred(_) => inferred_count += 1,
            ResolvedCompletion::Unresolved => {}
        }
        resolved.insert(trial_id, completion);
    }

    debug!(
        trial_count = resolved.len(),
        extracted_count, inferred_count, "completion dates resolved"
    );
    resolved
}

fn resolve_trial(
    inputs: &TrialDateInputs,
    results_completion: Option<NaiveDate>,
    config: &StudyConfig,
) -> ResolvedCompletion {
    // Step A: extracted date, results completion first.
    let protocol = apply_plausibility_window(inputs.protocol_completion, config);
    let results = apply_plausibility_window(results_completion, config);
    if let Some(date) = results.or(protocol) {
        return ResolvedCompletion::Extracted(date);
    }

    // Step B: inferred date from latest approval plus declared duration.
    if inputs.max_days == 0.0 {
        return ResolvedCompletion::Unresolved;
    }
    let Some(approval) = inputs.latest_approval else {
        return ResolvedCompletion::Unresolved;
    };
    match infer_completion(approval, inputs.max_days, config.inferred_buffer_months) {
        Some(date) => ResolvedCompletion::Inferred(date),
        None => ResolvedCompletion::Unresolved,
    }
}

/// `latest_approval + max_days` at day granularity, plus the conservative
/// buffer. Fractional days truncate, matching day-resolution timedeltas.
fn infer_completion(approval: NaiveDate, max_days: f64, buffer_months: u32) -> Option<NaiveDate> {
    let days = max_days.trunc() as i64;
    let shifted = if days >= 0 {
        approval.checked_add_days(Days::new(days as u64))?
    } else {
        approval.checked_sub_days(Days::new(days.unsigned_abs()))?
    };
    shifted.checked_add_months(Months::new(buffer_months))
}
