// src/corpus/record.rs
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use log::{info, warn};
use crate::error::{Error, Result};
use crate::types::{AnnotatorGolds, AnnotatorId, GoldEdit};

/// Gold edits of one sentence: a plain list, or lists keyed by annotator id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoldReference {
    Single(Vec<GoldEdit>),
    // JSON object keys are strings; ids are parsed on conversion
    Multi(BTreeMap<String, Vec<GoldEdit>>),
}

impl Default for GoldReference {
    fn default() -> Self {
        GoldReference::Single(Vec::new())
    }
}

impl GoldReference {
    /// Annotator-keyed view. A plain list belongs to annotator 0.
    pub fn annotators(&self) -> Result<AnnotatorGolds> {
        match self {
            GoldReference::Single(edits) => {
                let mut golds = AnnotatorGolds::new();
                golds.insert(0, edits.clone());
                Ok(golds)
            }
            GoldReference::Multi(map) => map
                .iter()
                .map(|(id, edits)| {
                    id.trim()
                        .parse::<AnnotatorId>()
                        .map(|id| (id, edits.clone()))
                        .map_err(|_| Error::invalid_record(format!("annotator id is not a number: {:?}", id)))
                })
                .collect(),
        }
    }
}

/// One sentence to score: source, system hypothesis and gold edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRecord {
    pub source: String,
    pub hypothesis: String,
    #[serde(default)]
    pub gold: GoldReference,
}

impl ScoringRecord {
    /// Checks every gold edit against the source tokens: the span must lie
    /// inside the sentence and its original text must be the tokens there.
    pub fn validate(&self) -> Result<AnnotatorGolds> {
        let tokens: Vec<&str> = self.source.split_whitespace().collect();
        let golds = self.gold.annotators()?;

        for (annotator, edits) in &golds {
            for edit in edits {
                if edit.start > edit.end || edit.end > tokens.len() {
                    return Err(Error::invalid_record(format!(
                        "annotator {}: span {}..{} outside a sentence of {} tokens",
                        annotator, edit.start, edit.end, tokens.len()
                    )));
                }
                let span = tokens[edit.start..edit.end].join(" ");
                if span != edit.original {
                    return Err(Error::invalid_record(format!(
                        "annotator {}: expected {:?} at {}..{}, found {:?}",
                        annotator, edit.original, edit.start, edit.end, span
                    )));
                }
            }
        }
        Ok(golds)
    }
}

/// Sentences ready for batch scoring, in input order.
#[derive(Debug, Clone, Default)]
pub struct ScoringBatch {
    pub sources: Vec<String>,
    pub hypotheses: Vec<String>,
    pub golds: Vec<AnnotatorGolds>,
    pub skipped: usize,
}

impl ScoringBatch {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// One gold set per sentence: the one of the lowest annotator id.
    pub fn single_reference_golds(&self) -> Vec<Vec<GoldEdit>> {
        self.golds
            .iter()
            .map(|golds| golds.values().next().cloned().unwrap_or_default())
            .collect()
    }
}

/// Reads JSON Lines records. Lines that fail to parse or validate are
/// logged and skipped; the remaining sentences keep their order.
pub fn read_records<R: BufRead>(reader: R) -> Result<ScoringBatch> {
    let mut batch = ScoringBatch::default();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record: ScoringRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping line {}: {}", line_num + 1, e);
                batch.skipped += 1;
                continue;
            }
        };
        match record.validate() {
            Ok(golds) => {
                batch.sources.push(record.source);
                batch.hypotheses.push(record.hypothesis);
                batch.golds.push(golds);
            }
            Err(e) => {
                warn!("Skipping line {}: {}", line_num + 1, e);
                batch.skipped += 1;
            }
        }
    }

    Ok(batch)
}

pub fn load_records<P: AsRef<Path>>(path: P) -> Result<ScoringBatch> {
    let file = File::open(&path)?;
    let batch = read_records(BufReader::new(file))?;
    info!(
        "Loaded {} sentences from {:?} ({} skipped)",
        batch.len(),
        path.as_ref(),
        batch.skipped
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_single_and_multi_gold() {
        let input = r#"{"source": "This are bad", "hypothesis": "This is bad", "gold": [{"start": 1, "end": 2, "original": "are", "corrections": ["is"]}]}
{"source": "He go", "hypothesis": "He goes", "gold": {"0": [], "1": [{"start": 1, "end": 2, "original": "go", "corrections": ["goes", "went"]}]}}
"#;
        let batch = read_records(Cursor::new(input)).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.golds[0][&0], vec![GoldEdit::new(1, 2, "are", ["is"])]);
        assert_eq!(batch.golds[1].len(), 2);
        assert!(batch.golds[1][&1][0].corrections.contains("went"));

        let single = batch.single_reference_golds();
        assert_eq!(single[0].len(), 1);
        assert!(single[1].is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let input = r#"not json
{"source": "a b", "hypothesis": "a c", "gold": [{"start": 1, "end": 3, "original": "b", "corrections": ["c"]}]}
{"source": "a b", "hypothesis": "a c", "gold": [{"start": 0, "end": 1, "original": "b", "corrections": ["c"]}]}

{"source": "a b", "hypothesis": "a c"}
"#;
        let batch = read_records(Cursor::new(input)).unwrap();
        assert_eq!(batch.skipped, 3);
        assert_eq!(batch.len(), 1);
        assert!(batch.golds[0][&0].is_empty());
    }

    #[test]
    fn test_bad_annotator_id() {
        let record = ScoringRecord {
            source: "a".to_string(),
            hypothesis: "a".to_string(),
            gold: GoldReference::Multi(BTreeMap::from([("first".to_string(), Vec::new())])),
        };
        assert!(matches!(record.validate(), Err(Error::InvalidRecord(_))));
    }

    #[test]
    fn test_load_records_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"source": "a", "hypothesis": "b", "gold": []}}"#).unwrap();
        let batch = load_records(file.path()).unwrap();
        assert_eq!(batch.hypotheses, vec!["b".to_string()]);
    }
}
