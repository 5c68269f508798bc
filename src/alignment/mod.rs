//! Edit alignment between a source sentence and a hypothesis: distance
//! table, alignment graph, transitive merging, gold-aware weighting and the
//! optimal edit path.

pub mod matrix;
pub mod graph;
pub mod closure;
pub mod weights;
pub mod path;

use log::trace;
use crate::config::subsystems::AlignmentConfig;

pub use self::matrix::{levenshtein_distance, levenshtein_matrix, DistanceMatrix};
pub use self::graph::{EdgeKey, EdgeLabel, EditGraph, Weight, UNIT_WEIGHT};
pub use self::closure::merge_edits;
pub use self::weights::EPSILON;

/// Builds the closed alignment graph of one sentence pair. The result can be
/// re-weighted for any number of gold edit sets.
pub fn align<A, B>(source: &[A], hypothesis: &[B], config: &AlignmentConfig) -> EditGraph
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let matrix = levenshtein_matrix(source, hypothesis, &config.costs);
    trace!("{}", matrix);

    let mut graph = EditGraph::from_matrix(&matrix);
    trace!("edits (w/o transitive arcs):\n{}", graph);

    graph.close(config.max_unchanged_words);
    trace!("edits (with transitive arcs):\n{}", graph);

    graph
}
