pub mod logging;
pub mod pipeline;
pub mod summary;
pub mod types;
