//! Reader for the EUCTR protocol dump.
//!
//! One row per country-level protocol; many rows share a trial identifier.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use euctr_model::{DurationComponents, EudractNumber, PipelineError, ProtocolRecord, Result};

use crate::parse::{
    HeaderLookup, normalize_cell, parse_date, parse_number, parse_optional_text, parse_status,
};

const EUDRACT_NUMBER: &str = "eudract_number";
const EUDRACT_NUMBER_WITH_COUNTRY: &str = "eudract_number_with_country";
const END_OF_TRIAL_STATUS: &str = "end_of_trial_status";
const TRIAL_RESULTS: &str = "trial_results";
const CA_DECISION_DATE: &str = "date_of_competent_authority_decision";
const ETHICS_OPINION_DATE: &str = "date_of_ethics_committee_opinion";
const COUNTRY_YEARS: &str = "trial_in_the_member_state_concerned_years";
const COUNTRY_MONTHS: &str = "trial_in_the_member_state_concerned_months";
const COUNTRY_DAYS: &str = "trial_in_the_member_state_concerned_days";
const GLOBAL_YEARS: &str = "trial_in_all_countries_concerned_by_the_trial_years";
const GLOBAL_MONTHS: &str = "trial_in_all_countries_concerned_by_the_trial_months";
const GLOBAL_DAYS: &str = "trial_in_all_countries_concerned_by_the_trial_days";
const PROTOCOL_COMPLETION: &str = "date_of_the_global_end_of_the_trial";

/// Read the protocol dump into typed records.
///
/// Rows with an empty trial identifier are rejected; every other field is
/// validated cell by cell.
pub fn read_protocol_dump(path: &Path) -> Result<Vec<ProtocolRecord>> {
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
    let columns = ProtocolColumns::resolve(&lookup)?;

    let mut records = Vec::new();
    for (row_index, row) in reader.records().enumerate() {
        let row = row.map_err(|error| {
            PipelineError::DataIntegrity(format!(
                "{} row {}: {error}",
                path.display(),
                row_index + 2
            ))
        })?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let eudract_number = normalize_cell(cell(columns.eudract_number));
        if eudract_number.is_empty() {
            return Err(PipelineError::DataIntegrity(format!(
                "{} row {}: empty {EUDRACT_NUMBER}",
                path.display(),
                row_index + 2
            )));
        }

        records.push(ProtocolRecord {
            eudract_number: EudractNumber::new(eudract_number),
            eudract_number_with_country: normalize_cell(cell(columns.country_id)),
            end_of_trial_status: parse_status(END_OF_TRIAL_STATUS, cell(columns.status))?,
            trial_results: parse_optional_text(cell(columns.trial_results)),
            competent_authority_decision: parse_date(CA_DECISION_DATE, cell(columns.ca_decision))?,
            ethics_committee_opinion: parse_date(
                ETHICS_OPINION_DATE,
                cell(columns.ethics_opinion),
            )?,
            country_duration: DurationComponents {
                years: parse_number(COUNTRY_YEARS, cell(columns.country_years))?,
                months: parse_number(COUNTRY_MONTHS, cell(columns.country_months))?,
                days: parse_number(COUNTRY_DAYS, cell(columns.country_days))?,
            },
            global_duration: DurationComponents {
                years: parse_number(GLOBAL_YEARS, cell(columns.global_years))?,
                months: parse_number(GLOBAL_MONTHS, cell(columns.global_months))?,
                days: parse_number(GLOBAL_DAYS, cell(columns.global_days))?,
            },
            protocol_completion: parse_date(
                PROTOCOL_COMPLETION,
                cell(columns.protocol_completion),
            )?,
        });
    }

    debug!(
        source_file = %path.display(),
        record_count = records.len(),
        "protocol dump loaded"
    );
    Ok(records)
}

struct ProtocolColumns {
    eudract_number: usize,
    country_id: usize,
    status: usize,
    trial_results: usize,
    ca_decision: usize,
    ethics_opinion: usize,
    country_years: usize,
    country_months: usize,
    country_days: usize,
    global_years: usize,
    global_months: usize,
    global_days: usize,
    protocol_completion: usize,
}

impl ProtocolColumns {
    fn resolve(lookup: &HeaderLookup) -> Result<Self> {
        Ok(Self {
            eudract_number: lookup.require(EUDRACT_NUMBER)?,
            country_id: lookup.require(EUDRACT_NUMBER_WITH_COUNTRY)?,
            status: lookup.require(END_OF_TRIAL_STATUS)?,
            trial_results: lookup.require(TRIAL_RESULTS)?,
            ca_decision: lookup.require(CA_DECISION_DATE)?,
            ethics_opinion: lookup.require(ETHICS_OPINION_DATE)?,
            country_years: lookup.require(COUNTRY_YEARS)?,
            country_months: lookup.require(COUNTRY_MONTHS)?,
            country_days: lookup.require(COUNTRY_DAYS)?,
            global_years: lookup.require(GLOBAL_YEARS)?,
            global_months: lookup.require(GLOBAL_MONTHS)?,
            global_days: lookup.require(GLOBAL_DAYS)?,
            protocol_completion: lookup.require(PROTOCOL_COMPLETION)?,
        })
    }
}
