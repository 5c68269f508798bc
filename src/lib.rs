//! m2score evaluates grammatical error correction output. It aligns a
//! system hypothesis with its source sentence through an edit graph, picks
//! the edit sequence that best matches the gold annotation, and reports
//! precision, recall and F1 over a corpus.

// Module declarations
pub mod error;
pub mod types;
pub mod config;
pub mod alignment;
pub mod scorer;
pub mod corpus;

// Re-exports
pub use error::{Error, Result};
pub use types::{AnnotatorGolds, AnnotatorId, Edit, EditKind, GoldEdit, Vertex};
pub use alignment::{align, levenshtein_distance, levenshtein_matrix, EditGraph};
pub use scorer::{CorpusReport, EditCounts, M2Scorer, Scores, SentenceEvaluation};

// Re-export the config from config module
pub use config::ScorerConfig;
