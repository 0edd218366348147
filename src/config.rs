// src/config.rs

//! Runtime configuration, loaded from an optional JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::hpgl::PaperSize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paper: PaperConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    pub size: PaperSize,
}

impl Config {
    /// Loads a configuration file; missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paper_is_a4() {
        assert_eq!(Config::default().paper.size, PaperSize::A4);
    }

    #[test]
    fn parses_paper_size() {
        let config: Config = serde_json::from_str(r#"{ "paper": { "size": "us" } }"#).unwrap();
        assert_eq!(config.paper.size, PaperSize::Us);
    }

    #[test]
    fn empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }
}
