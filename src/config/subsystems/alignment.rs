// src/config/subsystems/alignment.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::FromIni;

/// Per-operation costs of the edit distance table. A no-op always costs 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCosts {
    pub insert: usize,
    pub delete: usize,
    pub substitute: usize,
}

impl Default for EditCosts {
    fn default() -> Self {
        Self {
            insert: 1,
            delete: 1,
            substitute: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    // Upper bound on unchanged tokens a merged edit may embed
    pub max_unchanged_words: usize,
    pub costs: EditCosts,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            max_unchanged_words: 2,
            costs: EditCosts::default(),
        }
    }
}

fn parse_cost(key: &str, value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(cost) if cost > 0 => Ok(cost),
        _ => Err(Error::config(format!("Invalid {} (must be > 0): {}", key, value))),
    }
}

impl FromIni for AlignmentConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "alignment" {
            return None;
        }

        match key {
            "max_unchanged_words" => {
                match value.parse() {
                    Ok(words) => {
                        self.max_unchanged_words = words;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::config(format!("Invalid max_unchanged_words: {}", value)))),
                }
            },
            "cost_insert" => Some(parse_cost(key, value).map(|cost| self.costs.insert = cost)),
            "cost_delete" => Some(parse_cost(key, value).map(|cost| self.costs.delete = cost)),
            "cost_substitute" => Some(parse_cost(key, value).map(|cost| self.costs.substitute = cost)),
            _ => None,
        }
    }
}

impl AlignmentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.costs.insert == 0 || self.costs.delete == 0 || self.costs.substitute == 0 {
            return Err(Error::config("Edit costs must all be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alignment_keys() {
        let mut config = AlignmentConfig::default();
        assert!(matches!(config.from_ini_section("alignment", "max_unchanged_words", "3"), Some(Ok(()))));
        assert!(matches!(config.from_ini_section("alignment", "cost_delete", "2"), Some(Ok(()))));
        assert_eq!(config.max_unchanged_words, 3);
        assert_eq!(config.costs.delete, 2);
    }

    #[test]
    fn test_rejects_zero_cost() {
        let mut config = AlignmentConfig::default();
        assert!(matches!(
            config.from_ini_section("alignment", "cost_insert", "0"),
            Some(Err(Error::Config(_)))
        ));
        assert_eq!(config.costs.insert, 1);

        config.costs.substitute = 0;
        match config.validate() {
            Err(Error::Config(msg)) => assert!(msg.contains("greater than zero")),
            other => panic!("expected a config error, got {:?}", other),
        }
    }

    #[test]
    fn test_ignores_other_sections() {
        let mut config = AlignmentConfig::default();
        assert!(config.from_ini_section("scoring", "max_unchanged_words", "5").is_none());
    }
}
