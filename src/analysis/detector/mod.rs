//! PII detection module
//!
//! Two independent methods feed one output list:
//! - [`regex::RegexDetector`] runs the pattern library over the full text
//! - [`ner::StatisticalDetector`] runs a named-entity recognizer over a
//!   bounded prefix and keeps PERSON spans
//!
//! [`HybridDetector`] concatenates both, pattern results first. Spans found
//! by both methods are reported twice, once per method.

pub mod ner;
pub mod patterns;
pub mod regex;

use crate::analysis::models::PiiEntity;

/// Trait for PII detection implementations
///
/// Detection never fails: a detector that cannot run returns an empty list.
pub trait PiiDetector: Send + Sync {
    /// Detect PII in text; offsets are character offsets into `text`
    fn detect(&self, text: &str) -> Vec<PiiEntity>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Pattern detector followed by the statistical detector
pub struct HybridDetector {
    pattern: regex::RegexDetector,
    statistical: ner::StatisticalDetector,
}

impl HybridDetector {
    pub fn new(pattern: regex::RegexDetector, statistical: ner::StatisticalDetector) -> Self {
        Self {
            pattern,
            statistical,
        }
    }

    /// Whether the statistical recognizer is loaded
    pub fn statistical_available(&self) -> bool {
        self.statistical.is_available()
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern.pattern_count()
    }
}

impl PiiDetector for HybridDetector {
    fn detect(&self, text: &str) -> Vec<PiiEntity> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut entities = self.pattern.detect(text);
        let pattern_count = entities.len();
        entities.extend(self.statistical.detect(text));

        tracing::debug!(
            pattern = pattern_count,
            statistical = entities.len() - pattern_count,
            "PII detection finished"
        );

        entities
    }

    fn name(&self) -> &str {
        "hybrid"
    }
}

/// Byte-to-character offset translation for one text
///
/// Regex matches report byte offsets; entities carry character offsets.
pub(crate) struct CharOffsets {
    boundaries: Option<Vec<usize>>,
}

impl CharOffsets {
    pub(crate) fn new(text: &str) -> Self {
        let boundaries = if text.is_ascii() {
            None
        } else {
            Some(text.char_indices().map(|(i, _)| i).collect())
        };
        Self { boundaries }
    }

    /// Character offset of a byte offset lying on a char boundary
    pub(crate) fn char_offset(&self, byte_offset: usize) -> usize {
        match &self.boundaries {
            None => byte_offset,
            Some(boundaries) => boundaries.partition_point(|&b| b < byte_offset),
        }
    }
}
