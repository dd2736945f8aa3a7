use thiserror::Error;

/// Errors raised by the statistics toolkit.
///
/// Each variant carries enough context to trace which summary call failed;
/// callers decide whether a failure aborts the analysis or drops a covariate.
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("division by zero: {context}")]
    DivisionByZero { context: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Quasi-complete separation: a covariate perfectly predicts the outcome.
    /// This is an expected, documented failure mode of logistic regression on
    /// small stratified samples, not a defect.
    #[error("logistic model failed to converge; check covariate '{covariate}' for separation")]
    ConvergenceFailure { covariate: String },
}

pub type Result<T> = std::result::Result<T, StatsError>;
