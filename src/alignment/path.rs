use ahash::AHashMap;
use log::trace;
use crate::types::{Edit, Vertex};
use super::graph::{EdgeKey, EditGraph, Weight};

/// Path cost: total weight, then unchanged tokens swallowed by non-no-op
/// edits. Among equally weighted paths the one with the tightest edits wins.
type PathCost = (Weight, usize);

impl EditGraph {
    /// Minimum-cost path from the origin to the final vertex, as edges in
    /// path order. Bellman-Ford over the edges in insertion order; the graph
    /// is acyclic so negative gold weights are safe.
    pub fn best_path(&self) -> Vec<EdgeKey> {
        let start = self.start();
        let end = self.end();

        let mut cost: AHashMap<Vertex, PathCost> = AHashMap::with_capacity(self.vertices.len());
        let mut previous: AHashMap<Vertex, Vertex> = AHashMap::with_capacity(self.vertices.len());
        cost.insert(start, (0, 0));

        for round in 0..self.vertices.len().saturating_sub(1) {
            let mut relaxed = false;
            for &(from, to) in &self.edges {
                let (Some(&(weight, absorbed)), Some(arc)) = (cost.get(&from), self.arcs.get(&(from, to))) else {
                    continue;
                };
                let swallowed = if arc.edit.is_noop() { 0 } else { arc.edit.unchanged_words };
                let candidate = (weight + arc.weight, absorbed + swallowed);
                if cost.get(&to).map_or(true, |current| candidate < *current) {
                    cost.insert(to, candidate);
                    previous.insert(to, from);
                    relaxed = true;
                }
            }
            if !relaxed {
                trace!("path search settled after {} rounds", round + 1);
                break;
            }
        }

        let mut path = Vec::new();
        let mut vertex = end;
        while let Some(&from) = previous.get(&vertex) {
            path.push((from, vertex));
            vertex = from;
        }
        path.reverse();
        path
    }

    /// Edits along [`best_path`](Self::best_path) in source order, without no-ops.
    pub fn best_edit_sequence(&self) -> Vec<Edit> {
        self.best_path()
            .into_iter()
            .filter_map(|(from, to)| self.edit(from, to))
            .filter(|edit| !edit.is_noop())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::matrix::levenshtein_matrix;
    use crate::config::subsystems::EditCosts;
    use crate::types::GoldEdit;

    fn edits(source: &str, hypothesis: &str, gold: &[GoldEdit]) -> Vec<Edit> {
        let source: Vec<&str> = source.split_whitespace().collect();
        let hypothesis: Vec<&str> = hypothesis.split_whitespace().collect();
        let mut graph =
            EditGraph::from_matrix(&levenshtein_matrix(&source, &hypothesis, &EditCosts::default()));
        graph.close(2);
        graph.assign_weights(gold);
        graph.best_edit_sequence()
    }

    #[test]
    fn test_minimal_edit_without_gold() {
        assert_eq!(
            edits("This are bad", "This is bad", &[]),
            vec![Edit::substitute(1, "are", "is")]
        );
    }

    #[test]
    fn test_gold_pulls_merged_edit() {
        let gold = [GoldEdit::new(1, 3, "are bad", ["is bad"])];
        let found = edits("This are bad", "This is bad", &gold);
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (1, 3));
        assert_eq!(found[0].correction, "is bad");
    }

    #[test]
    fn test_edits_in_source_order() {
        let found = edits("the cat sat on mat", "the cats sat on the mat", &[
            GoldEdit::new(1, 2, "cat", ["cats"]),
            GoldEdit::new(4, 4, "", ["the"]),
        ]);
        assert_eq!(found, vec![Edit::substitute(1, "cat", "cats"), Edit::insert(4, "the")]);
    }

    #[test]
    fn test_leading_insertions_merge() {
        let found = edits("a b c", "x y a b c", &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, crate::types::EditKind::Insert);
        assert_eq!((found[0].start, found[0].end), (0, 0));
        assert_eq!(found[0].correction, "x y");
    }

    fn path_weight(graph: &EditGraph, path: &[EdgeKey]) -> Weight {
        path.iter().filter_map(|(from, to)| graph.weight(*from, *to)).sum()
    }

    fn counts(graph: &EditGraph, gold: &[GoldEdit]) -> (usize, usize) {
        let found = graph.best_edit_sequence();
        let correct = found.iter().filter(|e| gold.iter().any(|g| g.accepts(e))).count();
        (correct, found.len())
    }

    #[test]
    fn test_edge_order_does_not_change_cost_or_counts() {
        let pairs = [
            ("a b c d", "a c d e", vec![GoldEdit::new(3, 4, "d", ["d e"])]),
            ("the cat sat on mat", "the cats sat on the mat", vec![GoldEdit::new(4, 4, "", ["the"])]),
            ("a b", "b a", vec![GoldEdit::new(0, 1, "a", ["b"])]),
            ("x y z", "z y x w", vec![]),
        ];

        for (source, hypothesis, gold) in pairs {
            let source: Vec<&str> = source.split_whitespace().collect();
            let hypothesis: Vec<&str> = hypothesis.split_whitespace().collect();
            let mut graph =
                EditGraph::from_matrix(&levenshtein_matrix(&source, &hypothesis, &EditCosts::default()));
            graph.close(2);
            graph.assign_weights(&gold);

            let cost = path_weight(&graph, &graph.best_path());
            let expected = counts(&graph, &gold);

            let mut reordered = graph.clone();
            reordered.edges.reverse();
            assert_eq!(path_weight(&reordered, &reordered.best_path()), cost);
            assert_eq!(counts(&reordered, &gold), expected);

            let half = reordered.edges.len() / 2;
            reordered.edges.rotate_left(half);
            assert_eq!(path_weight(&reordered, &reordered.best_path()), cost);
            assert_eq!(counts(&reordered, &gold), expected);
        }
    }

    #[test]
    fn test_identical_and_empty() {
        assert!(edits("a b c", "a b c", &[]).is_empty());
        assert!(edits("", "", &[]).is_empty());
        assert_eq!(edits("a", "", &[]), vec![Edit::delete(0, "a")]);
    }
}
