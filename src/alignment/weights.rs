use log::trace;
use crate::types::GoldEdit;
use super::graph::{EditGraph, Weight, UNIT_WEIGHT};

/// Penalty added to every non-gold edit: 0.001 of a hop.
pub const EPSILON: Weight = 1;

impl EditGraph {
    /// Recomputes every edge weight for `gold`.
    ///
    /// An edit matching a gold edit weighs `-|E|` hops, which outweighs any
    /// sum of positive weights on a path. Other edits get their hop weight
    /// plus [`EPSILON`]; no-ops keep their hop weight. Weights are derived
    /// from the hop weights each time, so calling this again with the same
    /// gold edits changes nothing.
    pub fn assign_weights(&mut self, gold: &[GoldEdit]) {
        let gold_weight = -(self.edges.len() as Weight) * UNIT_WEIGHT;

        for key in &self.edges {
            let arc = match self.arcs.get_mut(key) {
                Some(arc) => arc,
                None => continue,
            };
            if arc.edit.is_noop() {
                arc.weight = arc.base_weight;
                continue;
            }
            match gold.iter().find(|g| g.accepts(&arc.edit)) {
                Some(matched) => {
                    trace!("edge {} -> {} matches gold edit {}", key.0, key.1, matched);
                    arc.weight = gold_weight;
                }
                None => arc.weight = arc.base_weight + EPSILON,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::matrix::levenshtein_matrix;
    use crate::config::subsystems::EditCosts;
    use crate::types::Vertex;

    fn graph(source: &str, hypothesis: &str) -> EditGraph {
        let source: Vec<&str> = source.split_whitespace().collect();
        let hypothesis: Vec<&str> = hypothesis.split_whitespace().collect();
        let mut graph =
            EditGraph::from_matrix(&levenshtein_matrix(&source, &hypothesis, &EditCosts::default()));
        graph.close(2);
        graph
    }

    #[test]
    fn test_gold_edge_gets_negative_weight() {
        let mut graph = graph("This are bad", "This is bad");
        graph.assign_weights(&[GoldEdit::new(1, 2, "are", ["is"])]);

        let edges = graph.edge_count() as Weight;
        assert_eq!(graph.weight(Vertex::new(1, 1), Vertex::new(2, 2)), Some(-edges * UNIT_WEIGHT));
        assert_eq!(graph.weight(Vertex::new(2, 2), Vertex::new(3, 3)), Some(UNIT_WEIGHT));
        assert_eq!(
            graph.weight(Vertex::new(1, 1), Vertex::new(3, 3)),
            Some(2 * UNIT_WEIGHT + EPSILON)
        );
    }

    #[test]
    fn test_reweighting_is_idempotent() {
        let mut graph = graph("This are bad", "This is bad");
        graph.assign_weights(&[]);
        let first: Vec<_> = graph.edges().iter().map(|(a, b)| graph.weight(*a, *b)).collect();
        graph.assign_weights(&[]);
        let second: Vec<_> = graph.edges().iter().map(|(a, b)| graph.weight(*a, *b)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_switching_gold_sets_resets_weights() {
        let mut graph = graph("This are bad", "This is bad");
        graph.assign_weights(&[GoldEdit::new(1, 2, "are", ["is"])]);
        graph.assign_weights(&[]);
        assert_eq!(
            graph.weight(Vertex::new(1, 1), Vertex::new(2, 2)),
            Some(UNIT_WEIGHT + EPSILON)
        );
    }
}
