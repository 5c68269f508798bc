use serde::{Serialize, Deserialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// `correct / proposed`, or 1.0 when nothing was proposed.
pub fn precision(correct: usize, proposed: usize) -> f64 {
    if proposed == 0 {
        return 1.0;
    }
    correct as f64 / proposed as f64
}

/// `correct / gold`, or 1.0 when there is nothing to find.
pub fn recall(correct: usize, gold: usize) -> f64 {
    if gold == 0 {
        return 1.0;
    }
    correct as f64 / gold as f64
}

/// `2 * correct / (proposed + gold)`; 1.0 when both counts are zero.
pub fn f1(correct: usize, proposed: usize, gold: usize) -> f64 {
    let total = proposed + gold;
    if total == 0 {
        return if correct == 0 { 1.0 } else { 0.0 };
    }
    2.0 * correct as f64 / total as f64
}

/// Sufficient statistics of one sentence or a whole corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditCounts {
    pub correct: usize,
    pub proposed: usize,
    pub gold: usize,
}

impl EditCounts {
    pub fn new(correct: usize, proposed: usize, gold: usize) -> Self {
        Self { correct, proposed, gold }
    }

    pub fn precision(&self) -> f64 {
        precision(self.correct, self.proposed)
    }

    pub fn recall(&self) -> f64 {
        recall(self.correct, self.gold)
    }

    pub fn f1(&self) -> f64 {
        f1(self.correct, self.proposed, self.gold)
    }

    pub fn scores(&self) -> Scores {
        Scores {
            precision: self.precision(),
            recall: self.recall(),
            f1: self.f1(),
        }
    }
}

impl Add for EditCounts {
    type Output = EditCounts;

    fn add(self, other: EditCounts) -> EditCounts {
        EditCounts {
            correct: self.correct + other.correct,
            proposed: self.proposed + other.proposed,
            gold: self.gold + other.gold,
        }
    }
}

impl AddAssign for EditCounts {
    fn add_assign(&mut self, other: EditCounts) {
        *self = *self + other;
    }
}

impl Sum for EditCounts {
    fn sum<I: Iterator<Item = EditCounts>>(iter: I) -> Self {
        iter.fold(EditCounts::default(), Add::add)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}
