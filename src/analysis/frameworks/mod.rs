//! Compliance framework registry
//!
//! Maps a framework id (e.g. `GDPR`) to the keyword set used for coverage
//! scoring. The built-in table is embedded from `patterns/frameworks.toml`,
//! parsed once per process and never mutated. A replacement table can be
//! loaded from a user TOML file with the same layout.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

const BUILTIN_FRAMEWORKS: &str = include_str!("../../../patterns/frameworks.toml");

static BUILTIN: OnceLock<Arc<FrameworkRegistry>> = OnceLock::new();

/// One regulatory framework and its reference terms
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrameworkDefinition {
    /// Short code, unique within a registry
    pub id: String,
    /// Lowercase reference terms, in table order
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct FrameworkLibrary {
    #[serde(default, rename = "framework")]
    frameworks: Vec<FrameworkDefinition>,
}

/// Read-only table of framework definitions
#[derive(Debug, Default)]
pub struct FrameworkRegistry {
    frameworks: Vec<FrameworkDefinition>,
    index: HashMap<String, usize>,
}

impl FrameworkRegistry {
    /// Process-wide registry built from the embedded table
    ///
    /// If the embedded table cannot be parsed the registry is empty and the
    /// error is logged; scoring then produces no entries.
    pub fn builtin() -> Arc<FrameworkRegistry> {
        BUILTIN
            .get_or_init(|| match Self::from_toml(BUILTIN_FRAMEWORKS) {
                Ok(registry) => Arc::new(registry),
                Err(e) => {
                    tracing::error!(error = %e, "Embedded framework table is invalid");
                    Arc::new(Self::default())
                }
            })
            .clone()
    }

    /// Load a registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read framework library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Build a registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: FrameworkLibrary =
            toml::from_str(content).context("Failed to parse framework library TOML")?;
        Self::from_definitions(library.frameworks)
    }

    /// Build a registry from definitions; ids must be unique
    pub fn from_definitions(definitions: Vec<FrameworkDefinition>) -> Result<Self> {
        let mut frameworks = Vec::with_capacity(definitions.len());
        let mut index = HashMap::new();

        for mut definition in definitions {
            let id = definition.id.trim().to_string();
            if id.is_empty() {
                anyhow::bail!("Framework definition with empty id");
            }
            if index.contains_key(&id) {
                anyhow::bail!("Duplicate framework id: {id}");
            }
            definition.id = id.clone();
            definition.keywords = definition
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();

            if definition.keywords.is_empty() {
                tracing::warn!(framework = %id, "Framework has no keywords and will always score 0");
            }

            index.insert(id, frameworks.len());
            frameworks.push(definition);
        }

        Ok(Self { frameworks, index })
    }

    /// Look up a framework by id
    pub fn lookup(&self, id: &str) -> Option<&FrameworkDefinition> {
        self.index.get(id).map(|&i| &self.frameworks[i])
    }

    /// All registered ids in table order
    pub fn all_ids(&self) -> Vec<String> {
        self.frameworks.iter().map(|f| f.id.clone()).collect()
    }

    /// All definitions in table order
    pub fn iter(&self) -> impl Iterator<Item = &FrameworkDefinition> {
        self.frameworks.iter()
    }

    pub fn len(&self) -> usize {
        self.frameworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }
}
