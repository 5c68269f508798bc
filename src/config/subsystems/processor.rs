// src/config/subsystems/processor.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::FromIni;
use log::LevelFilter;

fn level_from_str(level: &str) -> Option<LevelFilter> {
    match level {
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        "none" => Some(LevelFilter::Off),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    // Parallelization settings
    pub use_parallel: bool,
    pub thread_count: usize,

    // Log level
    pub log_level: String,
    #[serde(skip)]
    level_filter: Option<LevelFilter>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            use_parallel: true,
            thread_count: num_cpus::get().max(1),
            log_level: "info".to_string(),
            level_filter: Some(LevelFilter::Info),
        }
    }
}

impl FromIni for ProcessorConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "processor" {
            return None;
        }

        match key {
            "use_parallel" => {
                match value.parse() {
                    Ok(flag) => {
                        self.use_parallel = flag;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::config(format!("Invalid use_parallel value (must be true/false): {}", value)))),
                }
            },
            "thread_count" => {
                match value.parse() {
                    Ok(count) if count > 0 => {
                        self.thread_count = count;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::config(format!("Invalid thread_count (must be > 0): {}", value)))),
                }
            },
            "log_level" => Some(self.set_log_level(value)),
            _ => None,
        }
    }
}

impl ProcessorConfig {
    pub fn set_log_level(&mut self, value: &str) -> Result<()> {
        let level_str = value.trim().trim_matches('"').to_lowercase();
        match level_from_str(&level_str) {
            Some(level) => {
                self.log_level = level_str;
                self.level_filter = Some(level);
                Ok(())
            },
            None => Err(Error::config(format!("Invalid log level '{}'. Must be one of: none, error, warn, info, debug, trace", value))),
        }
    }

    pub fn get_log_level(&self) -> LevelFilter {
        if let Some(level) = self.level_filter {
            return level;
        }

        level_from_str(self.log_level.trim().to_lowercase().as_str())
            .unwrap_or(LevelFilter::Info)
    }

    pub fn validate(&self) -> Result<()> {
        if self.thread_count == 0 {
            return Err(Error::config("thread_count must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        let mut config = ProcessorConfig::default();
        assert!(config.set_log_level("DEBUG").is_ok());
        assert_eq!(config.get_log_level(), LevelFilter::Debug);
        assert!(config.set_log_level("none").is_ok());
        assert_eq!(config.get_log_level(), LevelFilter::Off);
        assert!(config.set_log_level("loud").is_err());
        assert_eq!(config.get_log_level(), LevelFilter::Off);
    }

    #[test]
    fn test_thread_count_must_be_positive() {
        let mut config = ProcessorConfig::default();
        assert!(matches!(config.from_ini_section("processor", "thread_count", "0"), Some(Err(_))));
        assert!(matches!(config.from_ini_section("processor", "thread_count", "2"), Some(Ok(()))));
        assert_eq!(config.thread_count, 2);
    }
}
