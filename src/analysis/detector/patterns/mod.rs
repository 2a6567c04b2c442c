//! Pattern library for PII detection

use crate::analysis::models::PiiLabel;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_PATTERNS: &str = include_str!("../../../../patterns/pii_patterns.toml");

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Identifier used in error messages
    pub name: String,
    /// PII label assigned to matches
    pub label: String,
    /// Regex patterns for this label
    pub patterns: Vec<String>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Compiled regex
    pub regex: Regex,
    /// PII label
    pub label: PiiLabel,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    #[serde(default, rename = "pattern")]
    patterns: Vec<PatternDefinition>,
}

/// Pattern registry for PII detection
///
/// Keeps patterns in library order so detection output is deterministic.
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::new();

        for def in library.patterns {
            let label: PiiLabel = def
                .label
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid label in pattern '{}'", def.name))?;

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str).with_context(|| {
                    format!("Invalid regex in pattern '{}': {pattern_str}", def.name)
                })?;

                patterns.push(CompiledPattern { regex, label });
            }
        }

        Ok(Self { patterns })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        Self::from_toml(DEFAULT_PATTERNS)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }
}
