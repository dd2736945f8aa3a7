//! Type-safe enumerations for EUCTR protocol metadata.
//!
//! The registry stores these concepts as free-text labels; parsing them into
//! enums at the ingestion boundary keeps every later stage total over a known
//! value set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// End-of-trial status as recorded on a country-level protocol.
///
/// The EUCTR publishes exactly these labels. A protocol with no status at all
/// is represented as `Option::None` on the record, not as a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndOfTrialStatus {
    Completed,
    Ongoing,
    Restarted,
    PrematurelyEnded,
    TemporarilyHalted,
    SuspendedByCa,
    NotAuthorised,
    ProhibitedByCa,
}

impl EndOfTrialStatus {
    /// Returns the label exactly as the registry prints it.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndOfTrialStatus::Completed => "Completed",
            EndOfTrialStatus::Ongoing => "Ongoing",
            EndOfTrialStatus::Restarted => "Restarted",
            EndOfTrialStatus::PrematurelyEnded => "Prematurely Ended",
            EndOfTrialStatus::TemporarilyHalted => "Temporarily Halted",
            EndOfTrialStatus::SuspendedByCa => "Suspended by CA",
            EndOfTrialStatus::NotAuthorised => "Not Authorised",
            EndOfTrialStatus::ProhibitedByCa => "Prohibited by CA",
        }
    }

    /// Returns true for the two refusal states that mean the protocol was
    /// never allowed to start in that country.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            EndOfTrialStatus::NotAuthorised | EndOfTrialStatus::ProhibitedByCa
        )
    }
}

impl fmt::Display for EndOfTrialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EndOfTrialStatus {
    type Err = String;

    /// Parse a registry status label (case-insensitive, trimmed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "COMPLETED" => Ok(EndOfTrialStatus::Completed),
            "ONGOING" => Ok(EndOfTrialStatus::Ongoing),
            "RESTARTED" => Ok(EndOfTrialStatus::Restarted),
            "PREMATURELY ENDED" => Ok(EndOfTrialStatus::PrematurelyEnded),
            "TEMPORARILY HALTED" => Ok(EndOfTrialStatus::TemporarilyHalted),
            "SUSPENDED BY CA" => Ok(EndOfTrialStatus::SuspendedByCa),
            "NOT AUTHORISED" => Ok(EndOfTrialStatus::NotAuthorised),
            "PROHIBITED BY CA" => Ok(EndOfTrialStatus::ProhibitedByCa),
            _ => Err(format!("Unknown end-of-trial status: {s}")),
        }
    }
}

/// Mutually exclusive inclusion/exclusion category assigned to every trial.
///
/// Rules are evaluated in declaration order; the first match wins, so a trial
/// refused everywhere is `NoEuStart` even when a date could be inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExclusionStatus {
    /// Refused or prohibited authorisation in every country protocol.
    NoEuStart,
    /// No extracted date and not enough information to infer one.
    CannotInfer,
    /// Completion date read directly from a registry field.
    Extracted,
    /// Completion date computed from approval date plus declared duration.
    Inferred,
}

impl ExclusionStatus {
    /// Returns the label used in the study's tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionStatus::NoEuStart => "No EU Start",
            ExclusionStatus::CannotInfer => "Cannot Infer",
            ExclusionStatus::Extracted => "Extracted",
            ExclusionStatus::Inferred => "Inferred",
        }
    }
}

impl fmt::Display for ExclusionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExclusionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "NO EU START" => Ok(ExclusionStatus::NoEuStart),
            "CANNOT INFER" => Ok(ExclusionStatus::CannotInfer),
            "EXTRACTED" => Ok(ExclusionStatus::Extracted),
            "INFERRED" => Ok(ExclusionStatus::Inferred),
            _ => Err(format!("Unknown exclusion status: {s}")),
        }
    }
}
