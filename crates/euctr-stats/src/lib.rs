//! Stateless statistics toolkit for the reporting analyses.
//!
//! Every estimator here is a pure function over its arguments: no
//! configuration, no shared state, no randomness.

pub mod crosstab;
pub mod dates;
pub mod error;
pub mod logit;
pub mod normal;
pub mod proportion;

pub use crosstab::{Crosstab, MARGIN_LABEL};
pub use dates::duplicate_date_check;
pub use error::{Result, StatsError};
pub use logit::{CovariateEffect, simple_logistic_regression};
pub use proportion::{Z_95, confidence_interval, proportion_z_test};
