//! Inclusion classification.
//!
//! Every trial in the universe receives exactly one exclusion status; the
//! rules are evaluated in a fixed order and the first match wins.

use std::collections::BTreeMap;

use tracing::debug;

use euctr_model::{
    EudractNumber, ExclusionStatus, InclusionRecord, ResolvedCompletion, StudyConfig,
    TrialStatusSummary,
};

/// Classify the full trial universe into inclusion records.
///
/// Rule order: never started in the EU, then unresolvable, then extracted,
/// then inferred. Eligibility requires a final date strictly before the
/// study cutoff; trials without a final date are never eligible.
pub fn classify_trials(
    summaries: &BTreeMap<EudractNumber, TrialStatusSummary>,
    resolved: &BTreeMap<EudractNumber, ResolvedCompletion>,
    config: &StudyConfig,
) -> Vec<InclusionRecord> {
    let mut records = Vec::with_capacity(summaries.len());
    for (trial_id, summary) in summaries {
        let (exclusion_status, final_date) = if summary.never_started() {
            (ExclusionStatus::NoEuStart, None)
        } else {
            match resolved.get(trial_id) {
                Some(ResolvedCompletion::Extracted(date)) => {
                    (ExclusionStatus::Extracted, Some(*date))
                }
                Some(ResolvedCompletion::Inferred(date)) => {
                    (ExclusionStatus::Inferred, Some(*date))
                }
                Some(ResolvedCompletion::Unresolved) | None => {
                    (ExclusionStatus::CannotInfer, None)
                }
            }
        };

        let eligible = final_date.is_some_and(|date| date < config.inclusion_cutoff);
        records.push(InclusionRecord {
            eudract_number: trial_id.clone(),
            exclusion_status,
            final_date,
            eligible,
            inferred: exclusion_status == ExclusionStatus::Inferred,
        });
    }

    let eligible_count = records.iter().filter(|record| record.eligible).count();
    debug!(
        trial_count = records.len(),
        eligible_count, "trials classified"
    );
    records
}
