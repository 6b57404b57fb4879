// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime configuration loaded from an optional TOML file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Size limits applied while validating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of attributes a subcategory may declare.
    pub max_attributes: usize,
    /// Maximum number of variants per product attribute.
    pub max_variants: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_attributes: 100,
            max_variants: 250,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON written by the CLI.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Top-level configuration. Every section is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub limits: Limits,
    pub log: LogConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration TOML")
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid configuration in {:?}", path))
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Serialize configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Missing sections keep their defaults.
    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml("[limits]\nmax_variants = 5\n").unwrap();
        assert_eq!(config.limits.max_variants, 5);
        assert_eq!(config.limits.max_attributes, 100);
        assert_eq!(config.log.filter, "info");
        assert!(config.output.pretty);
    }

    // Unknown top-level sections are a configuration error.
    #[test]
    fn unknown_sections_are_rejected() {
        assert!(Config::from_toml("[database]\nurl = \"x\"\n").is_err());
    }

    // Files are read from disk and absent paths yield defaults.
    #[test]
    fn load_reads_file_or_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catattr.toml");
        fs::write(&path, "[output]\npretty = false\n[log]\nfilter = \"catattr=debug\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.output.pretty);
        assert_eq!(config.log.filter, "catattr=debug");

        assert_eq!(Config::load(None).unwrap(), Config::default());
        assert!(Config::load(Some(&tmp.path().join("missing.toml"))).is_err());
    }

    // Serialized configuration parses back to the same value.
    #[test]
    fn to_toml_round_trips() {
        let config = Config {
            limits: Limits {
                max_attributes: 7,
                max_variants: 3,
            },
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
