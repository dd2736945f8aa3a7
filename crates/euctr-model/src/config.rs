//! Study configuration.
//!
//! Every constant that affects reproducibility lives here and is passed
//! explicitly into each pipeline stage. The defaults are the December 2020
//! study run; a per-study JSON copy of this struct should be versioned next
//! to the outputs it produced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Configuration constants for one study run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Earliest plausible completion date (inclusive). Dates before the
    /// registry existed are treated as entry errors.
    pub plausible_start: NaiveDate,
    /// Latest plausible completion date (inclusive). Completion dates are
    /// entered retrospectively, so future dates are entry errors.
    pub plausible_end: NaiveDate,
    /// A trial is eligible when its final date is strictly before this
    /// boundary (24 months before data extraction).
    pub inclusion_cutoff: NaiveDate,
    /// Conservative buffer added to every inferred completion date, in
    /// months.
    pub inferred_buffer_months: u32,
    pub primary_sample_size: usize,
    pub primary_seed: u64,
    pub replacement_sample_size: usize,
    pub replacement_seed: u64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            plausible_start: NaiveDate::from_ymd_opt(2004, 1, 1).expect("valid date"),
            plausible_end: NaiveDate::from_ymd_opt(2020, 12, 31).expect("valid date"),
            inclusion_cutoff: NaiveDate::from_ymd_opt(2018, 12, 1).expect("valid date"),
            inferred_buffer_months: 12,
            primary_sample_size: 500,
            primary_seed: 7872,
            replacement_sample_size: 20,
            replacement_seed: 6377,
        }
    }
}

impl StudyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when a completion date falls inside the plausibility
    /// window; both boundaries retain.
    pub fn is_plausible(&self, date: NaiveDate) -> bool {
        date >= self.plausible_start && date <= self.plausible_end
    }

    #[must_use]
    pub fn with_inclusion_cutoff(mut self, cutoff: NaiveDate) -> Self {
        self.inclusion_cutoff = cutoff;
        self
    }

    #[must_use]
    pub fn with_primary_sample(mut self, size: usize, seed: u64) -> Self {
        self.primary_sample_size = size;
        self.primary_seed = seed;
        self
    }

    #[must_use]
    pub fn with_replacement_sample(mut self, size: usize, seed: u64) -> Self {
        self.replacement_sample_size = size;
        self.replacement_seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausibility_window_is_inclusive() {
        let config = StudyConfig::default();
        assert!(config.is_plausible(NaiveDate::from_ymd_opt(2004, 1, 1).unwrap()));
        assert!(config.is_plausible(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()));
        assert!(!config.is_plausible(NaiveDate::from_ymd_opt(2003, 12, 31).unwrap()));
        assert!(!config.is_plausible(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()));
    }

    #[test]
    fn builders_override_defaults() {
        let config = StudyConfig::new()
            .with_primary_sample(10, 42)
            .with_replacement_sample(2, 43);
        assert_eq!(config.primary_sample_size, 10);
        assert_eq!(config.primary_seed, 42);
        assert_eq!(config.replacement_sample_size, 2);
        assert_eq!(config.replacement_seed, 43);
    }
}
