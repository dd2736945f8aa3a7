pub mod config;
pub mod enums;
pub mod error;
pub mod records;

pub use config::StudyConfig;
pub use enums::{EndOfTrialStatus, ExclusionStatus};
pub use error::{PipelineError, Result};
pub use records::{
    DurationComponents, EudractNumber, InclusionRecord, ProtocolRecord, ResolvedCompletion,
    SamplePlan, TrialStatusSummary,
};
