//! Tests for euctr-model types.

use chrono::NaiveDate;
use euctr_model::{
    EudractNumber, PipelineError, StudyConfig, TrialStatusSummary,
};

#[test]
fn status_summary_bucket_total() {
    let summary = TrialStatusSummary {
        number_of_countries: 5,
        completed: 2,
        ongoing: 1,
        terminated: 1,
        suspended: 0,
        other_status: 0,
        no_status: 1,
        results: 3,
    };
    assert_eq!(summary.bucket_total(), summary.number_of_countries);
    assert!(!summary.never_started());
}

#[test]
fn config_serializes() {
    let config = StudyConfig::default();
    let json = serde_json::to_string(&config).expect("serialize config");
    let round: StudyConfig = serde_json::from_str(&json).expect("deserialize config");
    assert_eq!(round, config);
    assert_eq!(
        round.inclusion_cutoff,
        NaiveDate::from_ymd_opt(2018, 12, 1).unwrap()
    );
    assert_eq!(round.primary_seed, 7872);
    assert_eq!(round.replacement_seed, 6377);
}

#[test]
fn eudract_number_orders_canonically() {
    let mut ids = vec![
        EudractNumber::new("2010-000002-11"),
        EudractNumber::new("2004-000001-01"),
        EudractNumber::new("2010-000001-22"),
    ];
    ids.sort();
    assert_eq!(ids[0].as_str(), "2004-000001-01");
    assert_eq!(ids[1].as_str(), "2010-000001-22");
    assert_eq!(ids[2].as_str(), "2010-000002-11");
}

#[test]
fn insufficient_population_displays_counts() {
    let error = PipelineError::InsufficientPopulation {
        requested: 500,
        available: 320,
    };
    let message = error.to_string();
    assert!(message.contains("500"));
    assert!(message.contains("320"));
}
