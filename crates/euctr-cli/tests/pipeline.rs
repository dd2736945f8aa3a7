//! Integration tests for the pipeline module, end to end over temp files.

use std::fs;
use std::path::PathBuf;

use euctr_cli::pipeline::{RunInputs, run_study};
use euctr_model::{ExclusionStatus, StudyConfig};
use tempfile::TempDir;

const PROTOCOL_HEADER: &str = "eudract_number,eudract_number_with_country,end_of_trial_status,\
trial_results,date_of_competent_authority_decision,date_of_ethics_committee_opinion,\
trial_in_the_member_state_concerned_years,trial_in_the_member_state_concerned_months,\
trial_in_the_member_state_concerned_days,trial_in_all_countries_concerned_by_the_trial_years,\
trial_in_all_countries_concerned_by_the_trial_months,\
trial_in_all_countries_concerned_by_the_trial_days,date_of_the_global_end_of_the_trial";

struct Fixture {
    _dir: TempDir,
    protocol_dump: PathBuf,
    results_scrape: PathBuf,
    output_dir: PathBuf,
}

/// A small study: 30 trials with extracted dates, one inferable trial, one
/// unresolvable trial, one never-started trial.
fn fixture() -> Fixture {
    let dir = TempDir::new().expect("temp dir");

    let mut protocol = String::from(PROTOCOL_HEADER);
    protocol.push('\n');
    for index in 0..30 {
        let year = 2010 + (index % 6);
        protocol.push_str(&format!(
            "2009-{index:06}-11,2009-{index:06}-11-GB,Completed,View results,\
             {year}-01-10,,,,,,,,{year}-06-15\n"
        ));
    }
    // Inferable: no completion date, approval plus one year declared.
    protocol.push_str(
        "2009-900001-22,2009-900001-22-FR,Ongoing,,2015-03-01,,,,400,,,,\n",
    );
    // Unresolvable: nothing usable at all.
    protocol.push_str("2009-900002-33,2009-900002-33-DE,Ongoing,,,,,,,,,,\n");
    // Never started: refused in its only country.
    protocol.push_str("2009-900003-44,2009-900003-44-IT,Not Authorised,,,,,,,,,,\n");

    let protocol_dump = dir.path().join("dump.csv");
    fs::write(&protocol_dump, protocol).expect("write dump");

    let results_scrape = dir.path().join("results.csv");
    fs::write(
        &results_scrape,
        "trial_id,global_end_of_trial_date\n2009-000000-11,2011-02-01\n",
    )
    .expect("write results");

    let output_dir = dir.path().join("output");
    Fixture {
        _dir: dir,
        protocol_dump,
        results_scrape,
        output_dir,
    }
}

fn small_config() -> StudyConfig {
    StudyConfig::default()
        .with_primary_sample(10, 7872)
        .with_replacement_sample(3, 6377)
}

#[test]
fn run_study_classifies_and_writes_outputs() {
    let fixture = fixture();
    let result = run_study(RunInputs {
        protocol_dump: &fixture.protocol_dump,
        results_scrape: &fixture.results_scrape,
        output_dir: fixture.output_dir.clone(),
        config: small_config(),
        dry_run: false,
    })
    .expect("run study");

    assert_eq!(result.trial_count, 33);
    assert_eq!(result.category_count(ExclusionStatus::Extracted), 30);
    assert_eq!(result.category_count(ExclusionStatus::Inferred), 1);
    assert_eq!(result.category_count(ExclusionStatus::CannotInfer), 1);
    assert_eq!(result.category_count(ExclusionStatus::NoEuStart), 1);
    // Every extracted date (2010-2015) and the inferred 2017 date fall before
    // the 2018-12-01 cutoff.
    assert_eq!(result.eligible_count, 31);
    assert_eq!(result.eligible_inferred_count, 1);
    assert_eq!(result.primary_sample_count, 10);
    assert_eq!(result.replacement_sample_count, 3);

    let outputs = result.outputs.expect("outputs written");
    let population = fs::read_to_string(&outputs.final_population).expect("read population");
    assert_eq!(population.lines().count(), 32); // header + 31 eligible trials
    // The results-scrape date overrides the protocol date for that trial.
    assert!(population.contains("2009-000000-11,2011-02-01,0"));
    // The inferred trial carries its flag and buffered date.
    assert!(population.contains("2009-900001-22,2017-04-04,1"));

    let primary = fs::read_to_string(&outputs.primary_sample).expect("read primary");
    assert_eq!(primary.lines().count(), 11);
    let replacement = fs::read_to_string(&outputs.replacement_sample).expect("read replacement");
    assert_eq!(replacement.lines().count(), 4);

    assert!(outputs.config_snapshot.exists());
}

#[test]
fn reruns_reproduce_identical_samples() {
    let fixture = fixture();
    let inputs = || RunInputs {
        protocol_dump: &fixture.protocol_dump,
        results_scrape: &fixture.results_scrape,
        output_dir: fixture.output_dir.clone(),
        config: small_config(),
        dry_run: false,
    };

    let first = run_study(inputs()).expect("first run");
    let first_primary =
        fs::read_to_string(&first.outputs.expect("outputs").primary_sample).expect("read");
    let second = run_study(inputs()).expect("second run");
    let second_primary =
        fs::read_to_string(&second.outputs.expect("outputs").primary_sample).expect("read");

    assert_eq!(first_primary, second_primary);
}

#[test]
fn dry_run_writes_nothing() {
    let fixture = fixture();
    let result = run_study(RunInputs {
        protocol_dump: &fixture.protocol_dump,
        results_scrape: &fixture.results_scrape,
        output_dir: fixture.output_dir.clone(),
        config: small_config(),
        dry_run: true,
    })
    .expect("dry run");

    assert!(result.outputs.is_none());
    assert!(result.output_dir.is_none());
    assert!(!fixture.output_dir.exists());
}

#[test]
fn insufficient_population_aborts_the_run() {
    let fixture = fixture();
    let error = run_study(RunInputs {
        protocol_dump: &fixture.protocol_dump,
        results_scrape: &fixture.results_scrape,
        output_dir: fixture.output_dir.clone(),
        config: StudyConfig::default(), // asks for 500 from 31 eligible
        dry_run: false,
    })
    .expect_err("too few eligible trials");

    assert!(error.to_string().contains("draw sample plan"));
}
