// src/config/file.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::Result;
use super::FromIni;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    // Logs go to stderr unless a directory is given
    pub log_dir: Option<PathBuf>,
}

impl FromIni for FileConfig {
    fn from_ini_section(&mut self, _section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        match key {
            "log_dir" => {
                let value = value.trim_matches('"');
                self.log_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
