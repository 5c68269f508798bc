pub mod alignment;
pub mod scoring;
pub mod processor;

pub use alignment::{AlignmentConfig, EditCosts};
pub use scoring::ScoringConfig;
pub use processor::ProcessorConfig;
