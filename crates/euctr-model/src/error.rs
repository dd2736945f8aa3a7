use thiserror::Error;

/// Errors raised by the completion-date pipeline.
///
/// The pipeline is a deterministic one-shot batch transform: every variant
/// means the input data violates an assumption and must be corrected
/// upstream. Nothing here is retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Duplicate identifiers where uniqueness is assumed, malformed dates,
    /// unknown status labels, or a missing required column.
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    /// A sample draw asked for more trials than the candidate pool holds.
    #[error("insufficient population: requested {requested}, available {available}")]
    InsufficientPopulation { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
