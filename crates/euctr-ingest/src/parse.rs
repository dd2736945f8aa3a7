//! Cell-level parsing shared by the protocol-dump and results-scrape readers.
//!
//! All validation happens here, at the ingestion boundary: once a value has
//! become a typed field, later stages never re-check it.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use euctr_model::{EndOfTrialStatus, PipelineError, Result};

/// Case-insensitive header lookup over one CSV file.
#[derive(Debug)]
pub struct HeaderLookup {
    indices: BTreeMap<String, usize>,
}

impl HeaderLookup {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let indices = headers
            .into_iter()
            .enumerate()
            .map(|(idx, header)| (normalize_cell(header.as_ref()).to_uppercase(), idx))
            .collect();
        Self { indices }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(&name.to_uppercase()).copied()
    }

    /// Column index for `name`, or a data-integrity error naming the column.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.get(name)
            .ok_or_else(|| PipelineError::DataIntegrity(format!("missing column: {name}")))
    }
}

/// Trim whitespace and strip a UTF-8 BOM from a raw cell value.
pub fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Parse an ISO `YYYY-MM-DD` date cell. Empty cells are absent values;
/// anything else malformed is a data-integrity error.
pub fn parse_date(column: &str, raw: &str) -> Result<Option<NaiveDate>> {
    let value = normalize_cell(raw);
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            PipelineError::DataIntegrity(format!("{column}: malformed date '{value}'"))
        })
}

/// Parse a numeric duration component. The dump stores these as floats.
pub fn parse_number(column: &str, raw: &str) -> Result<Option<f64>> {
    let value = normalize_cell(raw);
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| {
        PipelineError::DataIntegrity(format!("{column}: malformed number '{value}'"))
    })
}

/// Parse an end-of-trial status label.
pub fn parse_status(column: &str, raw: &str) -> Result<Option<EndOfTrialStatus>> {
    let value = normalize_cell(raw);
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<EndOfTrialStatus>()
        .map(Some)
        .map_err(|message| PipelineError::DataIntegrity(format!("{column}: {message}")))
}

/// A non-empty cell becomes `Some`; empty cells are absent.
pub fn parse_optional_text(raw: &str) -> Option<String> {
    let value = normalize_cell(raw);
    if value.is_empty() { None } else { Some(value) }
}
