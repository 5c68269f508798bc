//! Batch input and output of the scorer: JSON Lines sentence records in,
//! CSV and JSON reports out.

pub mod record;
pub mod report;

pub use self::record::{load_records, read_records, GoldReference, ScoringBatch, ScoringRecord};
pub use self::report::{save_sentence_report, write_sentence_report, ScoreSummary};
