use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;
use std::fmt;
use crate::types::{Edit, Vertex};
use super::matrix::DistanceMatrix;

/// Edge weights in thousandths of a hop, so sums stay exact.
pub type Weight = i64;

/// Weight of a primitive edge.
pub const UNIT_WEIGHT: Weight = 1000;

pub type EdgeKey = (Vertex, Vertex);

/// Edit and weights carried by one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub edit: Edit,
    /// Hop weight set when the edge was built or merged.
    pub base_weight: Weight,
    /// Weight seen by the path search after the last re-weighting.
    pub weight: Weight,
}

/// Alignment graph of one sentence pair. Edges point away from the origin.
#[derive(Debug, Clone, Default)]
pub struct EditGraph {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<EdgeKey>,
    pub(crate) arcs: AHashMap<EdgeKey, EdgeLabel>,
}

impl EditGraph {
    /// Walks the backpointers breadth-first from the final cell and turns
    /// each one into a unit-weight edge.
    pub fn from_matrix(matrix: &DistanceMatrix) -> Self {
        let mut graph = EditGraph::default();
        let mut queued = AHashSet::new();
        let mut queue = VecDeque::new();

        let end = matrix.final_vertex();
        queue.push_back(end);
        queued.insert(end);

        while let Some(vertex) = queue.pop_front() {
            graph.vertices.push(vertex);
            for (previous, edit) in matrix.backpointers(vertex) {
                graph.upsert((*previous, vertex), edit.clone(), UNIT_WEIGHT);
                if queued.insert(*previous) {
                    queue.push_back(*previous);
                }
            }
        }

        graph
    }

    /// Vertices in discovery order, the final cell first.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Edges in insertion order; the path search relaxes them in this order.
    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn arc(&self, from: Vertex, to: Vertex) -> Option<&EdgeLabel> {
        self.arcs.get(&(from, to))
    }

    pub fn edit(&self, from: Vertex, to: Vertex) -> Option<&Edit> {
        self.arc(from, to).map(|arc| &arc.edit)
    }

    pub fn weight(&self, from: Vertex, to: Vertex) -> Option<Weight> {
        self.arc(from, to).map(|arc| arc.weight)
    }

    pub fn start(&self) -> Vertex {
        Vertex::ORIGIN
    }

    /// Largest vertex under `(source, hypothesis)` ordering.
    pub fn end(&self) -> Vertex {
        self.vertices.iter().copied().max().unwrap_or(Vertex::ORIGIN)
    }

    /// Adds the edge or overwrites the edit and weights of an existing one in place.
    pub(crate) fn upsert(&mut self, key: EdgeKey, edit: Edit, base_weight: Weight) {
        let arc = EdgeLabel {
            edit,
            base_weight,
            weight: base_weight,
        };
        if self.arcs.insert(key, arc).is_none() {
            self.edges.push(key);
        }
    }
}

impl fmt::Display for EditGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertices: Vec<String> = self.vertices.iter().map(|v| v.to_string()).collect();
        writeln!(f, "V = [{}]", vertices.join(", "))?;
        writeln!(f, "E =")?;
        for (from, to) in &self.edges {
            if let Some(arc) = self.arcs.get(&(*from, *to)) {
                writeln!(
                    f,
                    "  {} -> {} {}{} weight={:.3}",
                    from,
                    to,
                    arc.edit.kind.as_str(),
                    arc.edit,
                    arc.weight as f64 / UNIT_WEIGHT as f64
                )?;
            }
        }
        Ok(())
    }
}
