use std::fmt;
use crate::config::subsystems::EditCosts;
use crate::types::{Edit, Vertex};

/// Levenshtein table over two token sequences that keeps every co-optimal
/// predecessor of each cell, not just one.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    distances: Vec<usize>,
    backpointers: Vec<Vec<(Vertex, Edit)>>,
}

impl DistanceMatrix {
    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    /// Number of tokens in the first (source) sequence.
    pub fn source_len(&self) -> usize {
        self.rows - 1
    }

    /// Number of tokens in the second (hypothesis) sequence.
    pub fn hypothesis_len(&self) -> usize {
        self.cols - 1
    }

    pub fn distance(&self, i: usize, j: usize) -> usize {
        self.distances[self.index(i, j)]
    }

    /// Co-optimal `(predecessor, edit)` pairs into `vertex`, in check order.
    pub fn backpointers(&self, vertex: Vertex) -> &[(Vertex, Edit)] {
        if vertex.source >= self.rows || vertex.hypothesis >= self.cols {
            return &[];
        }
        &self.backpointers[self.index(vertex.source, vertex.hypothesis)]
    }

    pub fn final_vertex(&self) -> Vertex {
        Vertex::new(self.source_len(), self.hypothesis_len())
    }

    pub fn edit_distance(&self) -> usize {
        self.distance(self.source_len(), self.hypothesis_len())
    }
}

impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "edit matrix:")?;
        for i in 0..self.rows {
            let row: Vec<String> = (0..self.cols)
                .map(|j| self.distance(i, j).to_string())
                .collect();
            writeln!(f, "  [{}]", row.join(", "))?;
        }
        writeln!(f, "backpointers:")?;
        for i in 0..self.rows {
            for j in 0..self.cols {
                let pointers = &self.backpointers[self.index(i, j)];
                if pointers.is_empty() {
                    continue;
                }
                write!(f, "  ({}, {}) <-", i, j)?;
                for (from, edit) in pointers {
                    write!(f, " {} {}{}", from, edit.kind.as_str(), edit)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Fills the distance table of `first` against `second`.
///
/// Each cell checks substitution (a no-op when the tokens are equal) first,
/// then deletion, then insertion, and records every one that reaches the
/// cell minimum.
pub fn levenshtein_matrix<A, B>(first: &[A], second: &[B], costs: &EditCosts) -> DistanceMatrix
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let rows = first.len() + 1;
    let cols = second.len() + 1;
    let mut matrix = DistanceMatrix {
        rows,
        cols,
        distances: vec![0; rows * cols],
        backpointers: vec![Vec::new(); rows * cols],
    };

    for i in 1..rows {
        let idx = matrix.index(i, 0);
        matrix.distances[idx] = matrix.distances[matrix.index(i - 1, 0)] + costs.delete;
        matrix.backpointers[idx].push((
            Vertex::new(i - 1, 0),
            Edit::delete(i - 1, first[i - 1].as_ref()),
        ));
    }
    for j in 1..cols {
        let idx = matrix.index(0, j);
        matrix.distances[idx] = matrix.distances[matrix.index(0, j - 1)] + costs.insert;
        // Nothing of the source is consumed yet, so every leading insertion sits at 0
        matrix.backpointers[idx].push((
            Vertex::new(0, j - 1),
            Edit::insert(0, second[j - 1].as_ref()),
        ));
    }

    for i in 1..rows {
        let source_token = first[i - 1].as_ref();
        for j in 1..cols {
            let target_token = second[j - 1].as_ref();
            let same = source_token == target_token;

            let deletion = matrix.distance(i - 1, j) + costs.delete;
            let insertion = matrix.distance(i, j - 1) + costs.insert;
            let substitution = matrix.distance(i - 1, j - 1) + if same { 0 } else { costs.substitute };
            let best = substitution.min(deletion).min(insertion);

            let mut pointers = Vec::with_capacity(3);
            if substitution == best {
                let edit = if same {
                    Edit::noop(i - 1, source_token)
                } else {
                    Edit::substitute(i - 1, source_token, target_token)
                };
                pointers.push((Vertex::new(i - 1, j - 1), edit));
            }
            if deletion == best {
                pointers.push((Vertex::new(i - 1, j), Edit::delete(i - 1, source_token)));
            }
            if insertion == best {
                pointers.push((Vertex::new(i, j - 1), Edit::insert(i, target_token)));
            }

            let idx = matrix.index(i, j);
            matrix.distances[idx] = best;
            matrix.backpointers[idx] = pointers;
        }
    }

    matrix
}

/// Unit-cost token edit distance.
pub fn levenshtein_distance<A, B>(first: &[A], second: &[B]) -> usize
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    levenshtein_matrix(first, second, &EditCosts::default()).edit_distance()
}
