//! Contingency tables with margins.

use std::collections::{BTreeMap, BTreeSet};

/// Label used for row, column, and grand totals.
pub const MARGIN_LABEL: &str = "All";

/// Stratum x outcome contingency table of counts, with margins.
///
/// Labels are kept sorted so the table renders deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crosstab {
    strata: Vec<String>,
    outcomes: Vec<String>,
    counts: BTreeMap<(String, String), u64>,
}

impl Crosstab {
    /// Build a table from `(stratum, outcome)` pairs, one per record.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
        let mut strata = BTreeSet::new();
        let mut outcomes = BTreeSet::new();
        for (stratum, outcome) in pairs {
            strata.insert(stratum.to_string());
            outcomes.insert(outcome.to_string());
            *counts
                .entry((stratum.to_string(), outcome.to_string()))
                .or_insert(0) += 1;
        }
        Self {
            strata: strata.into_iter().collect(),
            outcomes: outcomes.into_iter().collect(),
            counts,
        }
    }

    pub fn strata(&self) -> &[String] {
        &self.strata
    }

    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    /// Count for one cell; `MARGIN_LABEL` on either axis gives a total.
    pub fn count(&self, stratum: &str, outcome: &str) -> u64 {
        match (stratum == MARGIN_LABEL, outcome == MARGIN_LABEL) {
            (true, true) => self.grand_total(),
            (true, false) => self.outcome_total(outcome),
            (false, true) => self.stratum_total(stratum),
            (false, false) => self
                .counts
                .get(&(stratum.to_string(), outcome.to_string()))
                .copied()
                .unwrap_or(0),
        }
    }

    /// Row margin: all records in one stratum.
    pub fn stratum_total(&self, stratum: &str) -> u64 {
        self.outcomes
            .iter()
            .map(|outcome| self.count(stratum, outcome))
            .sum()
    }

    /// Column margin: all records with one outcome value.
    pub fn outcome_total(&self, outcome: &str) -> u64 {
        self.strata
            .iter()
            .map(|stratum| self.count(stratum, outcome))
            .sum()
    }

    pub fn grand_total(&self) -> u64 {
        self.counts.values().sum()
    }
}
