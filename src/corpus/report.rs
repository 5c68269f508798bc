// src/corpus/report.rs
use serde::{Serialize, Deserialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::error::Result;
use crate::scorer::{CorpusReport, EditCounts};

/// Corpus-level figures printed by `score_edits --json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub counts: EditCounts,
    pub sentences: usize,
    pub skipped: usize,
}

impl ScoreSummary {
    pub fn new(report: &CorpusReport, skipped: usize) -> Self {
        Self {
            precision: report.scores.precision,
            recall: report.scores.recall,
            f1: report.scores.f1,
            counts: report.counts,
            sentences: report.sentences.len(),
            skipped,
        }
    }
}

/// One CSV row per sentence with its counts and scores.
pub fn write_sentence_report<W: Write>(writer: W, report: &CorpusReport) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    csv_writer.write_record(&[
        "sentence",
        "annotator",
        "correct",
        "proposed",
        "gold",
        "precision",
        "recall",
        "f1",
        "edits",
    ])?;

    for sentence in &report.sentences {
        let edits: Vec<String> = sentence.edits.iter().map(|e| e.to_string()).collect();
        let scores = sentence.counts.scores();
        csv_writer.write_record(&[
            (sentence.index + 1).to_string(),
            sentence.annotator.map_or(String::new(), |a| a.to_string()),
            sentence.counts.correct.to_string(),
            sentence.counts.proposed.to_string(),
            sentence.counts.gold.to_string(),
            format!("{:.4}", scores.precision),
            format!("{:.4}", scores.recall),
            format!("{:.4}", scores.f1),
            edits.join(" | "),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn save_sentence_report<P: AsRef<Path>>(path: P, report: &CorpusReport) -> Result<()> {
    let file = File::create(path)?;
    write_sentence_report(BufWriter::new(file), report)
}
