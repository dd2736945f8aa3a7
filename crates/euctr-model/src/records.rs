//! Typed records flowing between pipeline stages.
//!
//! Each stage consumes the previous stage's output table and produces a new
//! one; nothing here is mutated after creation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::{EndOfTrialStatus, ExclusionStatus};

/// Trial identifier (Eudract number), shared by every country protocol of a
/// trial and by all downstream tables.
///
/// `Ord` is derived so identifier sets sort canonically; the sampler relies
/// on that to stay independent of input row order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EudractNumber(String);

impl EudractNumber {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EudractNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EudractNumber {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Declared trial duration components from one protocol row.
///
/// The dump stores these as floats; missing components count as zero when the
/// duration is turned into days.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DurationComponents {
    pub years: Option<f64>,
    pub months: Option<f64>,
    pub days: Option<f64>,
}

impl DurationComponents {
    /// Total declared duration in days, with a 364-day year and a 30-day
    /// month.
    pub fn total_days(&self) -> f64 {
        self.years.unwrap_or(0.0) * 364.0
            + self.months.unwrap_or(0.0) * 30.0
            + self.days.unwrap_or(0.0)
    }
}

/// One country-level protocol entry from the registry dump.
///
/// Many records share a trial identifier; immutable once scraped.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolRecord {
    pub eudract_number: EudractNumber,
    /// Country-qualified identifier, e.g. `2015-001234-56-GB`.
    pub eudract_number_with_country: String,
    pub end_of_trial_status: Option<EndOfTrialStatus>,
    /// Raw results-presence marker; any non-empty value counts as results.
    pub trial_results: Option<String>,
    pub competent_authority_decision: Option<NaiveDate>,
    pub ethics_committee_opinion: Option<NaiveDate>,
    /// Duration declared for the member state concerned.
    pub country_duration: DurationComponents,
    /// Duration declared for all countries concerned by the trial.
    pub global_duration: DurationComponents,
    /// Protocol-level global end of trial date.
    pub protocol_completion: Option<NaiveDate>,
}

impl ProtocolRecord {
    pub fn has_results(&self) -> bool {
        self.trial_results
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }
}

/// Per-trial rollup of country-protocol statuses.
///
/// The status buckets are mutually exclusive per record, so their sum equals
/// `number_of_countries`; `no_status` and `results` are orthogonal counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStatusSummary {
    pub number_of_countries: usize,
    pub completed: usize,
    pub ongoing: usize,
    pub terminated: usize,
    pub suspended: usize,
    pub other_status: usize,
    pub no_status: usize,
    pub results: usize,
}

impl TrialStatusSummary {
    /// Sum over every status bucket; equals `number_of_countries` for a
    /// well-formed trial.
    pub fn bucket_total(&self) -> usize {
        self.completed
            + self.ongoing
            + self.terminated
            + self.suspended
            + self.other_status
            + self.no_status
    }

    /// True iff every country protocol was refused or prohibited.
    pub fn never_started(&self) -> bool {
        self.number_of_countries > 0 && self.other_status == self.number_of_countries
    }
}

/// Canonical completion date for one trial, tagged with its provenance.
///
/// Extracted takes precedence over Inferred when both are derivable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedCompletion {
    /// Read directly from a registry-provided field.
    Extracted(NaiveDate),
    /// Computed from approval date plus declared duration plus buffer.
    Inferred(NaiveDate),
    /// No usable date information.
    Unresolved,
}

impl ResolvedCompletion {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ResolvedCompletion::Extracted(date) | ResolvedCompletion::Inferred(date) => Some(*date),
            ResolvedCompletion::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.date().is_some()
    }
}

/// Final classification of one trial; created once, read-only afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct InclusionRecord {
    pub eudract_number: EudractNumber,
    pub exclusion_status: ExclusionStatus,
    /// Resolved completion date for Extracted/Inferred trials.
    pub final_date: Option<NaiveDate>,
    /// `final_date` is earlier than the study cutoff.
    pub eligible: bool,
    /// Restates `exclusion_status == Inferred`; stratification covariate.
    pub inferred: bool,
}

/// The frozen sample draw: a primary sample and a disjoint replacement pool.
///
/// Identical eligible population and identical seeds reproduce both lists,
/// membership and order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    pub primary: Vec<EudractNumber>,
    pub replacement: Vec<EudractNumber>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_total_days_fills_missing_with_zero() {
        let duration = DurationComponents {
            years: Some(1.0),
            months: None,
            days: Some(6.0),
        };
        assert_eq!(duration.total_days(), 370.0);
        assert_eq!(DurationComponents::default().total_days(), 0.0);
    }

    #[test]
    fn never_started_requires_all_refusals() {
        let summary = TrialStatusSummary {
            number_of_countries: 2,
            other_status: 2,
            ..TrialStatusSummary::default()
        };
        assert!(summary.never_started());

        let mixed = TrialStatusSummary {
            number_of_countries: 3,
            other_status: 2,
            completed: 1,
            ..TrialStatusSummary::default()
        };
        assert!(!mixed.never_started());
    }

    #[test]
    fn resolved_completion_date_access() {
        let date = NaiveDate::from_ymd_opt(2016, 5, 1).unwrap();
        assert_eq!(ResolvedCompletion::Extracted(date).date(), Some(date));
        assert_eq!(ResolvedCompletion::Inferred(date).date(), Some(date));
        assert_eq!(ResolvedCompletion::Unresolved.date(), None);
    }
}
