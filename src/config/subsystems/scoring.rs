// src/config/subsystems/scoring.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    // Skip proposed edits that only change casing or spacing
    pub ignore_whitespace_casing: bool,
    // Per-sentence report blocks
    pub verbose: bool,
    // Matrix, backpointer and graph dumps
    pub very_verbose: bool,
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    value.trim().to_lowercase().parse().map_err(|_| {
        Error::config(format!("Invalid {} value (must be true/false): {}", key, value))
    })
}

impl FromIni for ScoringConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "scoring" {
            return None;
        }

        match key {
            "ignore_whitespace_casing" => {
                Some(parse_flag(key, value).map(|flag| self.ignore_whitespace_casing = flag))
            },
            "verbose" => Some(parse_flag(key, value).map(|flag| self.verbose = flag)),
            "very_verbose" => Some(parse_flag(key, value).map(|flag| self.very_verbose = flag)),
            _ => None,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut config = ScoringConfig::default();
        assert!(matches!(config.from_ini_section("scoring", "ignore_whitespace_casing", "True"), Some(Ok(()))));
        assert!(config.ignore_whitespace_casing);
        assert!(matches!(config.from_ini_section("scoring", "verbose", "maybe"), Some(Err(_))));
        assert!(!config.verbose);
    }
}
