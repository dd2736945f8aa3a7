//! End-to-end pipeline tests over synthetic trial populations.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use euctr_core::{classify_trials, draw_sample_plan, never_started_trials, resolve_dates, summarize_trials};
use euctr_model::{
    DurationComponents, EndOfTrialStatus, EudractNumber, ExclusionStatus, InclusionRecord,
    PipelineError, ProtocolRecord, StudyConfig,
};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn record(
    trial: &str,
    country_suffix: &str,
    status: EndOfTrialStatus,
    completion: Option<NaiveDate>,
) -> ProtocolRecord {
    ProtocolRecord {
        eudract_number: EudractNumber::new(trial),
        eudract_number_with_country: format!("{trial}-{country_suffix}"),
        end_of_trial_status: Some(status),
        trial_results: None,
        competent_authority_decision: None,
        ethics_committee_opinion: None,
        country_duration: DurationComponents::default(),
        global_duration: DurationComponents::default(),
        protocol_completion: completion,
    }
}

/// 600 synthetic trials: 550 started with completion dates spread over
/// 2010-2019, 50 refused everywhere.
fn synthetic_dump() -> Vec<ProtocolRecord> {
    let mut records = Vec::new();
    for index in 0..550usize {
        let trial = format!("2009-{index:06}-10");
        // Spread completions month by month across 2010-2019.
        let year = 2010 + (index % 10) as i32;
        let month = 1 + (index % 12) as u32;
        records.push(record(
            &trial,
            "GB",
            EndOfTrialStatus::Completed,
            Some(ymd(year, month, 15)),
        ));
    }
    for index in 0..50usize {
        let trial = format!("2009-9{index:05}-20");
        records.push(record(&trial, "GB", EndOfTrialStatus::NotAuthorised, None));
        records.push(record(&trial, "DE", EndOfTrialStatus::ProhibitedByCa, None));
    }
    records
}

fn run_pipeline(records: &[ProtocolRecord], config: &StudyConfig) -> Vec<InclusionRecord> {
    let summaries = summarize_trials(records).expect("aggregate");
    let never_started = never_started_trials(&summaries);
    let resolved = resolve_dates(records, &BTreeMap::new(), &never_started, config);
    classify_trials(&summaries, &resolved, config)
}

#[test]
fn end_to_end_population_matches_expected_counts() {
    let config = StudyConfig::default();
    let records = synthetic_dump();
    let inclusions = run_pipeline(&records, &config);

    assert_eq!(inclusions.len(), 600);

    let never_started = inclusions
        .iter()
        .filter(|record| record.exclusion_status == ExclusionStatus::NoEuStart)
        .count();
    assert_eq!(never_started, 50);

    let extracted = inclusions
        .iter()
        .filter(|record| record.exclusion_status == ExclusionStatus::Extracted)
        .count();
    assert_eq!(extracted, 550);

    // Eligibility is exactly the started trials completed before the cutoff.
    let expected_eligible = inclusions
        .iter()
        .filter(|record| {
            record
                .final_date
                .is_some_and(|date| date < config.inclusion_cutoff)
        })
        .count();
    let eligible = inclusions.iter().filter(|record| record.eligible).count();
    assert_eq!(eligible, expected_eligible);
    // Years 2010-2017 complete for 440 trials; the 55 trials completing in
    // 2018 all land before December, so they stay under the cutoff too.
    assert_eq!(eligible, 495);
}

#[test]
fn sampler_raises_only_when_eligible_count_is_short() {
    let config = StudyConfig::default();
    let records = synthetic_dump();
    let inclusions = run_pipeline(&records, &config);

    // 495 eligible trials cannot support a 500-trial primary draw.
    let error = draw_sample_plan(&inclusions, &config).expect_err("too few eligible");
    assert!(matches!(
        error,
        PipelineError::InsufficientPopulation {
            requested: 500,
            available: 495,
        }
    ));

    // Moving the cutoff past 2019 makes every started trial eligible.
    let relaxed = config.with_inclusion_cutoff(ymd(2020, 1, 1));
    let relaxed_inclusions = run_pipeline(&records, &relaxed);
    let plan = draw_sample_plan(&relaxed_inclusions, &relaxed).expect("enough eligible trials");
    assert_eq!(plan.primary.len(), relaxed.primary_sample_size);
    assert_eq!(plan.replacement.len(), relaxed.replacement_sample_size);
}

#[test]
fn pipeline_is_idempotent() {
    let config = StudyConfig::default();
    let records = synthetic_dump();

    let first = run_pipeline(&records, &config);
    let second = run_pipeline(&records, &config);
    assert_eq!(first, second);

    let mut reordered = records.clone();
    reordered.reverse();
    let mut from_reordered = run_pipeline(&reordered, &config);
    let mut sorted_first = first.clone();
    sorted_first.sort_by(|a, b| a.eudract_number.cmp(&b.eudract_number));
    from_reordered.sort_by(|a, b| a.eudract_number.cmp(&b.eudract_number));
    assert_eq!(sorted_first, from_reordered);
}

#[test]
fn sample_plan_is_reproducible_across_runs() {
    let config = StudyConfig::default()
        .with_primary_sample(100, 7872)
        .with_replacement_sample(20, 6377);
    let records = synthetic_dump();
    let inclusions = run_pipeline(&records, &config);

    let first = draw_sample_plan(&inclusions, &config).expect("plan");
    let second = draw_sample_plan(&inclusions, &config).expect("plan");
    assert_eq!(first, second);
}
