//! Protocol aggregation: roll country-level rows up into one status summary
//! per trial.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use euctr_model::{
    EndOfTrialStatus, EudractNumber, PipelineError, ProtocolRecord, Result, TrialStatusSummary,
};

/// Group protocol rows by trial and compute each trial's status summary.
///
/// The status buckets are mutually exclusive per row, so bucket counts sum to
/// the country count. A duplicate country-qualified identifier within one
/// trial would break that invariant and is rejected as a data-integrity
/// violation.
pub fn summarize_trials(
    records: &[ProtocolRecord],
) -> Result<BTreeMap<EudractNumber, TrialStatusSummary>> {
    let mut summaries: BTreeMap<EudractNumber, TrialStatusSummary> = BTreeMap::new();
    let mut seen_countries: BTreeSet<&str> = BTreeSet::new();

    for record in records {
        if !seen_countries.insert(record.eudract_number_with_country.as_str()) {
            return Err(PipelineError::DataIntegrity(format!(
                "duplicate country protocol: {}",
                record.eudract_number_with_country
            )));
        }

        let summary = summaries.entry(record.eudract_number.clone()).or_default();
        summary.number_of_countries += 1;
        match record.end_of_trial_status {
            Some(EndOfTrialStatus::Completed) => summary.completed += 1,
            Some(EndOfTrialStatus::Ongoing | EndOfTrialStatus::Restarted) => summary.ongoing += 1,
            Some(EndOfTrialStatus::PrematurelyEnded) => summary.terminated += 1,
            Some(EndOfTrialStatus::TemporarilyHalted | EndOfTrialStatus::SuspendedByCa) => {
                summary.suspended += 1
            }
            Some(EndOfTrialStatus::NotAuthorised | EndOfTrialStatus::ProhibitedByCa) => {
                summary.other_status += 1
            }
            None => summary.no_status += 1,
        }
        if record.has_results() {
            summary.results += 1;
        }
    }

    debug!(
        row_count = records.len(),
        trial_count = summaries.len(),
        "protocol rows aggregated"
    );
    Ok(summaries)
}

/// Trials whose every country protocol was refused or prohibited.
pub fn never_started_trials(
    summaries: &BTreeMap<EudractNumber, TrialStatusSummary>,
) -> BTreeSet<EudractNumber> {
    summaries
        .iter()
        .filter(|(_, summary)| summary.never_started())
        .map(|(id, _)| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use euctr_model::DurationComponents;

    fn record(
        trial: &str,
        country: &str,
        status: Option<EndOfTrialStatus>,
        results: Option<&str>,
    ) -> ProtocolRecord {
        ProtocolRecord {
            eudract_number: EudractNumber::new(trial),
            eudract_number_with_country: country.to_string(),
            end_of_trial_status: status,
            trial_results: results.map(str::to_string),
            competent_authority_decision: None,
            ethics_committee_opinion: None,
            country_duration: DurationComponents::default(),
            global_duration: DurationComponents::default(),
            protocol_completion: None,
        }
    }

    #[test]
    fn buckets_are_exclusive_and_sum_to_country_count() {
        let records = vec![
            record("2010-1", "2010-1-GB", Some(EndOfTrialStatus::Completed), Some("View results")),
            record("2010-1", "2010-1-DE", Some(EndOfTrialStatus::Ongoing), None),
            record("2010-1", "2010-1-FR", Some(EndOfTrialStatus::Restarted), None),
            record("2010-1", "2010-1-IT", Some(EndOfTrialStatus::PrematurelyEnded), None),
            record("2010-1", "2010-1-ES", Some(EndOfTrialStatus::TemporarilyHalted), None),
            record("2010-1", "2010-1-NL", Some(EndOfTrialStatus::NotAuthorised), None),
            record("2010-1", "2010-1-BE", None, Some("View results")),
        ];
        let summaries = summarize_trials(&records).expect("aggregate");
        let summary = summaries.get(&EudractNumber::new("2010-1")).expect("trial");

        assert_eq!(summary.number_of_countries, 7);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.ongoing, 2);
        assert_eq!(summary.terminated, 1);
        assert_eq!(summary.suspended, 1);
        assert_eq!(summary.other_status, 1);
        assert_eq!(summary.no_status, 1);
        assert_eq!(summary.results, 2);
        assert_eq!(summary.bucket_total(), summary.number_of_countries);
    }

    #[test]
    fn never_started_iff_every_row_refused() {
        let records = vec![
            record("2010-1", "2010-1-GB", Some(EndOfTrialStatus::NotAuthorised), None),
            record("2010-1", "2010-1-DE", Some(EndOfTrialStatus::ProhibitedByCa), None),
            record("2010-2", "2010-2-GB", Some(EndOfTrialStatus::NotAuthorised), None),
            record("2010-2", "2010-2-DE", Some(EndOfTrialStatus::Completed), None),
        ];
        let summaries = summarize_trials(&records).expect("aggregate");
        let never_started = never_started_trials(&summaries);

        assert!(never_started.contains(&EudractNumber::new("2010-1")));
        assert!(!never_started.contains(&EudractNumber::new("2010-2")));
    }

    #[test]
    fn duplicate_country_protocol_is_rejected() {
        let records = vec![
            record("2010-1", "2010-1-GB", Some(EndOfTrialStatus::Completed), None),
            record("2010-1", "2010-1-GB", Some(EndOfTrialStatus::Ongoing), None),
        ];
        let error = summarize_trials(&records).expect_err("duplicate must fail");
        assert!(matches!(error, PipelineError::DataIntegrity(_)));
    }

    #[test]
    fn aggregation_is_order_independent() {
        let mut records = vec![
            record("2010-1", "2010-1-GB", Some(EndOfTrialStatus::Completed), None),
            record("2010-1", "2010-1-DE", Some(EndOfTrialStatus::Ongoing), Some("View results")),
            record("2010-2", "2010-2-GB", None, None),
        ];
        let forward = summarize_trials(&records).expect("aggregate");
        records.reverse();
        let reversed = summarize_trials(&records).expect("aggregate");
        assert_eq!(forward, reversed);
    }
}
