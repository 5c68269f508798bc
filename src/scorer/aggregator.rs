use log::{debug, info, trace};
use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use std::fmt;
use crate::alignment::{self, EditGraph};
use crate::config::ScorerConfig;
use crate::error::{Error, Result};
use crate::types::{AnnotatorGolds, AnnotatorId, Edit, GoldEdit};
use super::matching::{drop_cosmetic_edits, match_edits};
use super::metrics::{EditCounts, Scores};

/// Outcome of scoring one sentence against one gold edit set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceEvaluation {
    pub index: usize,
    /// Annotator whose edits were used, for multi-reference scoring.
    pub annotator: Option<AnnotatorId>,
    pub source: String,
    pub hypothesis: String,
    pub edits: Vec<Edit>,
    pub gold: Vec<GoldEdit>,
    pub correct: Vec<Edit>,
    pub counts: EditCounts,
}

fn list<T: fmt::Display>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(|item| item.to_string()).collect();
    format!("[{}]", items.join(", "))
}

impl fmt::Display for SentenceEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(annotator) = self.annotator {
            writeln!(f, ">> Annotator: {}", annotator)?;
        }
        writeln!(f, "SOURCE        : {}", self.source)?;
        writeln!(f, "HYPOTHESIS    : {}", self.hypothesis)?;
        writeln!(f, "EDIT SEQ      : {}", list(&self.edits))?;
        writeln!(f, "GOLD EDITS    : {}", list(&self.gold))?;
        writeln!(f, "CORRECT EDITS : {}", list(&self.correct))?;
        writeln!(f, "# correct     : {}", self.counts.correct)?;
        writeln!(f, "# proposed    : {}", self.counts.proposed)?;
        writeln!(f, "# gold        : {}", self.counts.gold)?;
        write!(f, "-------------------------------------------")
    }
}

/// Corpus totals plus the per-sentence evaluations they were summed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub counts: EditCounts,
    pub scores: Scores,
    pub sentences: Vec<SentenceEvaluation>,
}

impl CorpusReport {
    fn from_sentences(sentences: Vec<SentenceEvaluation>) -> Self {
        let counts: EditCounts = sentences.iter().map(|s| s.counts).sum();
        Self {
            counts,
            scores: counts.scores(),
            sentences,
        }
    }
}

impl fmt::Display for CorpusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Precision   : {:.4}", self.scores.precision)?;
        writeln!(f, "Recall      : {:.4}", self.scores.recall)?;
        write!(f, "F_1.0       : {:.4}", self.scores.f1)
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Scores system hypotheses against gold edits through the alignment graph.
#[derive(Debug, Clone, Default)]
pub struct M2Scorer {
    config: ScorerConfig,
}

impl M2Scorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Closed alignment graph of a whitespace-tokenized sentence pair.
    pub fn align(&self, source: &str, hypothesis: &str) -> EditGraph {
        alignment::align(&tokenize(source), &tokenize(hypothesis), &self.config.alignment)
    }

    /// Re-weights `graph` for `gold` and returns the chosen edits and the
    /// ones gold accepts.
    fn extract(&self, graph: &mut EditGraph, gold: &[GoldEdit]) -> (Vec<Edit>, Vec<Edit>) {
        graph.assign_weights(gold);
        let mut edits = graph.best_edit_sequence();
        trace!("Graph(V,E) =\n{}", graph);
        trace!("viterbi path = {:?}", edits);

        if self.config.scoring.ignore_whitespace_casing {
            edits = drop_cosmetic_edits(edits);
        }
        let correct = match_edits(&edits, gold);
        (edits, correct)
    }

    fn evaluate_graph(
        &self,
        graph: &mut EditGraph,
        index: usize,
        annotator: Option<AnnotatorId>,
        source: &str,
        hypothesis: &str,
        gold: &[GoldEdit],
    ) -> SentenceEvaluation {
        let (edits, correct) = self.extract(graph, gold);
        let counts = EditCounts::new(correct.len(), edits.len(), gold.len());
        SentenceEvaluation {
            index,
            annotator,
            source: source.to_string(),
            hypothesis: hypothesis.to_string(),
            edits,
            gold: gold.to_vec(),
            correct,
            counts,
        }
    }

    /// Optimal edit sequence of one sentence for `gold`.
    pub fn sentence_edits(&self, source: &str, hypothesis: &str, gold: &[GoldEdit]) -> Vec<Edit> {
        let mut graph = self.align(source, hypothesis);
        self.extract(&mut graph, gold).0
    }

    /// Edits and counts of one sentence.
    pub fn evaluate_sentence(&self, source: &str, hypothesis: &str, gold: &[GoldEdit]) -> SentenceEvaluation {
        let mut graph = self.align(source, hypothesis);
        let evaluation = self.evaluate_graph(&mut graph, 0, None, source, hypothesis, gold);
        debug!(
            "sentence: correct={} proposed={} gold={}",
            evaluation.counts.correct, evaluation.counts.proposed, evaluation.counts.gold
        );
        evaluation
    }

    /// Correct, proposed and gold edit counts of one sentence.
    pub fn sentence_counts(&self, source: &str, hypothesis: &str, gold: &[GoldEdit]) -> EditCounts {
        self.evaluate_sentence(source, hypothesis, gold).counts
    }

    pub fn sentence_scores(&self, source: &str, hypothesis: &str, gold: &[GoldEdit]) -> Scores {
        self.sentence_counts(source, hypothesis, gold).scores()
    }

    pub fn precision(&self, source: &str, hypothesis: &str, gold: &[GoldEdit]) -> f64 {
        self.sentence_scores(source, hypothesis, gold).precision
    }

    pub fn recall(&self, source: &str, hypothesis: &str, gold: &[GoldEdit]) -> f64 {
        self.sentence_scores(source, hypothesis, gold).recall
    }

    pub fn f1(&self, source: &str, hypothesis: &str, gold: &[GoldEdit]) -> f64 {
        self.sentence_scores(source, hypothesis, gold).f1
    }

    /// Runs `job` on a pool of `thread_count` threads.
    fn in_pool<T, F>(&self, job: F) -> Result<T>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.processor.thread_count)
            .build()?;
        Ok(pool.install(job))
    }

    fn check_lengths(sources: usize, hypotheses: usize, golds: usize) -> Result<()> {
        if sources != hypotheses || sources != golds {
            return Err(Error::input_mismatch(format!(
                "{} sources, {} hypotheses, {} gold edit sets",
                sources, hypotheses, golds
            )));
        }
        Ok(())
    }

    /// Corpus scores with one gold edit set per sentence. Counts are summed
    /// over all sentences before computing precision, recall and F1.
    pub fn batch_scores<S>(&self, sources: &[S], hypotheses: &[S], golds: &[Vec<GoldEdit>]) -> Result<CorpusReport>
    where
        S: AsRef<str> + Sync,
    {
        Self::check_lengths(sources.len(), hypotheses.len(), golds.len())?;
        info!("Scoring {} sentences against single references", sources.len());

        let evaluate = |index: usize| {
            let source = sources[index].as_ref();
            let hypothesis = hypotheses[index].as_ref();
            let mut graph = self.align(source, hypothesis);
            self.evaluate_graph(&mut graph, index, None, source, hypothesis, &golds[index])
        };

        let sentences: Vec<SentenceEvaluation> = if self.config.processor.use_parallel {
            self.in_pool(|| (0..sources.len()).into_par_iter().map(evaluate).collect())?
        } else {
            (0..sources.len()).map(evaluate).collect()
        };

        let report = CorpusReport::from_sentences(sentences);
        info!(
            "correct={} proposed={} gold={} P={:.4} R={:.4} F1={:.4}",
            report.counts.correct,
            report.counts.proposed,
            report.counts.gold,
            report.scores.precision,
            report.scores.recall,
            report.scores.f1
        );
        Ok(report)
    }

    pub fn batch_precision<S>(&self, sources: &[S], hypotheses: &[S], golds: &[Vec<GoldEdit>]) -> Result<f64>
    where
        S: AsRef<str> + Sync,
    {
        Ok(self.batch_scores(sources, hypotheses, golds)?.scores.precision)
    }

    pub fn batch_recall<S>(&self, sources: &[S], hypotheses: &[S], golds: &[Vec<GoldEdit>]) -> Result<f64>
    where
        S: AsRef<str> + Sync,
    {
        Ok(self.batch_scores(sources, hypotheses, golds)?.scores.recall)
    }

    pub fn batch_f1<S>(&self, sources: &[S], hypotheses: &[S], golds: &[Vec<GoldEdit>]) -> Result<f64>
    where
        S: AsRef<str> + Sync,
    {
        Ok(self.batch_scores(sources, hypotheses, golds)?.scores.f1)
    }

    /// Evaluates every annotator of one sentence on the same closed graph.
    /// A sentence without annotators is not aligned and adds nothing to the
    /// corpus counts.
    fn annotator_candidates(
        &self,
        index: usize,
        source: &str,
        hypothesis: &str,
        golds: &AnnotatorGolds,
    ) -> Vec<SentenceEvaluation> {
        if golds.is_empty() {
            debug!("sentence {} has no annotators", index);
            return vec![SentenceEvaluation {
                index,
                annotator: None,
                source: source.to_string(),
                hypothesis: hypothesis.to_string(),
                edits: Vec::new(),
                gold: Vec::new(),
                correct: Vec::new(),
                counts: EditCounts::default(),
            }];
        }
        let mut graph = self.align(source, hypothesis);
        golds
            .iter()
            .map(|(annotator, gold)| {
                self.evaluate_graph(&mut graph, index, Some(*annotator), source, hypothesis, gold)
            })
            .collect()
    }

    /// Corpus scores with several references per sentence.
    ///
    /// Sentences are visited in order; for each one the annotator that
    /// maximizes the cumulative F1 so far is kept. Ties go to more correct
    /// edits, then to fewer proposed plus gold edits. The choice depends on
    /// sentence order.
    pub fn batch_multi_scores<S>(&self, sources: &[S], hypotheses: &[S], golds: &[AnnotatorGolds]) -> Result<CorpusReport>
    where
        S: AsRef<str> + Sync,
    {
        Self::check_lengths(sources.len(), hypotheses.len(), golds.len())?;
        info!("Scoring {} sentences against multiple references", sources.len());

        let candidates_for = |index: usize| {
            self.annotator_candidates(index, sources[index].as_ref(), hypotheses[index].as_ref(), &golds[index])
        };

        // Candidate counts do not depend on earlier choices; only the selection is sequential
        let candidates: Vec<Vec<SentenceEvaluation>> = if self.config.processor.use_parallel {
            self.in_pool(|| (0..sources.len()).into_par_iter().map(candidates_for).collect())?
        } else {
            (0..sources.len()).map(candidates_for).collect()
        };

        let mut total = EditCounts::default();
        let mut chosen = Vec::with_capacity(candidates.len());

        for sentence_candidates in candidates {
            let mut best: Option<(SentenceEvaluation, EditCounts, f64)> = None;

            for candidate in sentence_candidates {
                let local = total + candidate.counts;
                let local_f1 = local.f1();
                let better = match &best {
                    None => true,
                    Some((_, best_counts, best_f1)) => {
                        local_f1 > *best_f1
                            || (local_f1 == *best_f1 && local.correct > best_counts.correct)
                            || (local_f1 == *best_f1
                                && local.correct == best_counts.correct
                                && local.proposed + local.gold < best_counts.proposed + best_counts.gold)
                    }
                };
                debug!(
                    "sentence {} annotator {:?}: cumulative correct={} proposed={} gold={} f1={:.4}",
                    candidate.index, candidate.annotator, local.correct, local.proposed, local.gold, local_f1
                );
                if better {
                    best = Some((candidate, local, local_f1));
                }
            }

            if let Some((evaluation, local, _)) = best {
                debug!("Chosen annotator for line {}: {:?}", evaluation.index + 1, evaluation.annotator);
                total = local;
                chosen.push(evaluation);
            }
        }

        let report = CorpusReport::from_sentences(chosen);
        info!(
            "correct={} proposed={} gold={} P={:.4} R={:.4} F1={:.4}",
            report.counts.correct,
            report.counts.proposed,
            report.counts.gold,
            report.scores.precision,
            report.scores.recall,
            report.scores.f1
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sequential() -> M2Scorer {
        let mut config = ScorerConfig::default();
        config.processor.use_parallel = false;
        M2Scorer::new(config)
    }

    #[test]
    fn test_sentence_scenarios() {
        let scorer = sequential();
        let gold = vec![GoldEdit::new(1, 2, "are", ["is"])];

        let evaluation = scorer.evaluate_sentence("This are bad", "This is bad", &gold);
        assert_eq!(evaluation.edits, vec![Edit::substitute(1, "are", "is")]);
        assert_eq!(evaluation.counts, EditCounts::new(1, 1, 1));
        assert_eq!(scorer.sentence_counts("This are bad", "This is bad", &[]), EditCounts::new(0, 1, 0));

        let scores = scorer.sentence_scores("This are bad", "This is bad", &[]);
        assert_eq!(scores, Scores { precision: 0.0, recall: 1.0, f1: 0.0 });

        assert_eq!(scorer.f1("a b c", "a b c", &[]), 1.0);
        assert_eq!(scorer.recall("a b c", "a b c", &gold), 0.0);
    }

    #[test]
    fn test_ignore_whitespace_casing() {
        let mut config = ScorerConfig::default();
        config.processor.use_parallel = false;
        config.scoring.ignore_whitespace_casing = true;
        let scorer = M2Scorer::new(config);

        let edits = scorer.sentence_edits("the big fat cat are here", "The big fat cat is here", &[]);
        assert_eq!(edits, vec![Edit::substitute(4, "are", "is")]);
        let unfiltered = sequential().sentence_edits("the big fat cat are here", "The big fat cat is here", &[]);
        assert_eq!(unfiltered[0], Edit::substitute(0, "the", "The"));
        assert_eq!(unfiltered.len(), 2);
    }

    #[test]
    fn test_batch_rejects_mismatched_lengths() {
        let scorer = sequential();
        let result = scorer.batch_scores(&["a b"], &["a b", "c"], &[vec![]]);
        assert!(matches!(result, Err(Error::InputMismatch(_))));

        let result = scorer.batch_multi_scores(&["a"], &["a"], &[]);
        assert!(matches!(result, Err(Error::InputMismatch(_))));
    }

    #[test]
    fn test_batch_sums_counts() {
        let scorer = sequential();
        let sources = ["This are bad", "He go home"];
        let hypotheses = ["This is bad", "He go home"];
        let golds = vec![
            vec![GoldEdit::new(1, 2, "are", ["is"])],
            vec![GoldEdit::new(1, 2, "go", ["goes"])],
        ];
        let report = scorer.batch_scores(&sources, &hypotheses, &golds).unwrap();
        assert_eq!(report.counts, EditCounts::new(1, 1, 2));
        assert_eq!(report.scores.precision, 1.0);
        assert_eq!(report.scores.recall, 0.5);
        assert!((report.scores.f1 - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(report.sentences.len(), 2);
        assert_eq!(report.sentences[1].index, 1);
    }

    #[test]
    fn test_multi_reference_picks_best_annotator() {
        let scorer = sequential();
        let mut golds = BTreeMap::new();
        golds.insert(0, vec![GoldEdit::new(1, 2, "are", ["was"])]);
        golds.insert(1, vec![GoldEdit::new(1, 2, "are", ["is"])]);

        let report = scorer
            .batch_multi_scores(&["This are bad"], &["This is bad"], &[golds])
            .unwrap();
        assert_eq!(report.sentences[0].annotator, Some(1));
        assert_eq!(report.counts, EditCounts::new(1, 1, 1));
    }

    #[test]
    fn test_report_display() {
        let report = CorpusReport::from_sentences(Vec::new());
        let text = report.to_string();
        assert!(text.contains("Precision   : 1.0000"));
        assert!(text.contains("F_1.0       : 1.0000"));
    }
}
