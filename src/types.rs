use serde::{Serialize, Deserialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Position in the alignment lattice: `source` tokens consumed and
/// `hypothesis` tokens produced so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Vertex {
    pub source: usize,
    pub hypothesis: usize,
}

impl Vertex {
    pub const ORIGIN: Vertex = Vertex { source: 0, hypothesis: 0 };

    pub fn new(source: usize, hypothesis: usize) -> Self {
        Self { source, hypothesis }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source, self.hypothesis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Insert,
    Delete,
    Substitute,
    NoOp,
}

impl EditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditKind::Insert => "ins",
            EditKind::Delete => "del",
            EditKind::Substitute => "sub",
            EditKind::NoOp => "noop",
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, EditKind::NoOp)
    }
}

/// A primitive or merged transformation of the source span `start..end`
/// into `correction`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
    pub kind: EditKind,
    pub start: usize,
    pub end: usize,
    pub original: String,
    pub correction: String,
    /// Unchanged tokens embedded in this edit; bounds transitive merging.
    pub unchanged_words: usize,
}

impl Edit {
    pub fn insert(at: usize, correction: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            start: at,
            end: at,
            original: String::new(),
            correction: correction.into(),
            unchanged_words: 0,
        }
    }

    pub fn delete(start: usize, original: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            start,
            end: start + 1,
            original: original.into(),
            correction: String::new(),
            unchanged_words: 0,
        }
    }

    pub fn substitute(start: usize, original: impl Into<String>, correction: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Substitute,
            start,
            end: start + 1,
            original: original.into(),
            correction: correction.into(),
            unchanged_words: 0,
        }
    }

    pub fn noop(start: usize, token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            kind: EditKind::NoOp,
            start,
            end: start + 1,
            original: token.clone(),
            correction: token,
            unchanged_words: 1,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.kind.is_noop()
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {:?}, {:?})",
            self.start, self.end, self.original, self.correction
        )
    }
}

/// A human-annotated correction. Any string in `corrections` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoldEdit {
    pub start: usize,
    pub end: usize,
    pub original: String,
    pub corrections: BTreeSet<String>,
}

impl GoldEdit {
    pub fn new<I, S>(start: usize, end: usize, original: impl Into<String>, corrections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start,
            end,
            original: original.into(),
            corrections: corrections.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact span and original text, correction drawn from the accepted set.
    pub fn accepts(&self, edit: &Edit) -> bool {
        edit.start == self.start
            && edit.end == self.end
            && edit.original == self.original
            && self.corrections.contains(&edit.correction)
    }
}

impl fmt::Display for GoldEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {:?}, {:?})",
            self.start, self.end, self.original, self.corrections
        )
    }
}

pub type AnnotatorId = u32;

/// Gold edits keyed by annotator, iterated in ascending annotator order.
pub type AnnotatorGolds = BTreeMap<AnnotatorId, Vec<GoldEdit>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_ordering() {
        let mut vertices = vec![Vertex::new(2, 1), Vertex::new(0, 3), Vertex::new(2, 0)];
        vertices.sort();
        assert_eq!(vertices, vec![Vertex::new(0, 3), Vertex::new(2, 0), Vertex::new(2, 1)]);
    }

    #[test]
    fn test_gold_accepts_alternatives() {
        let gold = GoldEdit::new(1, 2, "are", ["is", "was"]);
        assert!(gold.accepts(&Edit::substitute(1, "are", "is")));
        assert!(gold.accepts(&Edit::substitute(1, "are", "was")));
        assert!(!gold.accepts(&Edit::substitute(1, "are", "be")));
        assert!(!gold.accepts(&Edit::substitute(2, "are", "is")));
    }

    #[test]
    fn test_primitive_constructors() {
        let ins = Edit::insert(3, "the");
        assert_eq!((ins.start, ins.end), (3, 3));
        assert!(ins.original.is_empty());

        let noop = Edit::noop(0, "a");
        assert_eq!(noop.unchanged_words, 1);
        assert_eq!(noop.original, noop.correction);
    }
}
