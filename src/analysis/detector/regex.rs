//! Regex-based PII detector

use super::{patterns::PatternRegistry, CharOffsets, PiiDetector};
use crate::analysis::models::{DetectionMethod, PiiEntity};
use anyhow::Result;
use std::sync::Arc;

/// Regex-based PII detector
///
/// Runs every pattern over the full text in library order; within one
/// pattern, matches are reported left to right and never overlap.
#[derive(Clone)]
pub struct RegexDetector {
    pattern_registry: Arc<PatternRegistry>,
}

impl RegexDetector {
    /// Create a new regex detector with default patterns
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new regex detector with custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
        }
    }

    /// Number of compiled patterns
    pub fn pattern_count(&self) -> usize {
        self.pattern_registry.all_patterns().len()
    }
}

impl PiiDetector for RegexDetector {
    fn detect(&self, text: &str) -> Vec<PiiEntity> {
        if text.is_empty() {
            return Vec::new();
        }

        let offsets = CharOffsets::new(text);
        let mut entities = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            for matched in pattern.regex.find_iter(text) {
                if matched.as_str().is_empty() {
                    continue;
                }
                entities.push(PiiEntity::new(
                    matched.as_str(),
                    pattern.label,
                    offsets.char_offset(matched.start()),
                    offsets.char_offset(matched.end()),
                    DetectionMethod::Pattern,
                ));
            }
        }

        entities
    }

    fn name(&self) -> &str {
        "regex"
    }
}
