pub mod aggregator;
pub mod matching;
pub mod metrics;

// Re-export the main types
pub use self::aggregator::{CorpusReport, M2Scorer, SentenceEvaluation};
pub use self::matching::{equals_ignore_whitespace_casing, match_edits};
pub use self::metrics::{EditCounts, Scores};
