//! Core engines of the reporting-study pipeline: protocol aggregation,
//! completion-date resolution, inclusion classification, and seeded sampling.

pub mod aggregate;
pub mod classify;
pub mod dates;
pub mod sample;

pub use aggregate::{never_started_trials, summarize_trials};
pub use classify::classify_trials;
pub use dates::{apply_plausibility_window, resolve_dates};
pub use sample::{draw_sample_plan, seeded_sample};
