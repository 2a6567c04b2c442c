//! Compliance scores, violations and the combined analysis result

use super::pii_entity::{PiiEntity, PiiLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Text placed in `ai_insights` whenever no narrative was requested or possible
pub const AI_INSIGHTS_UNAVAILABLE: &str = "AI Analysis not enabled or API key missing.";

/// Scores below this produce a violation
pub const VIOLATION_THRESHOLD: f64 = 50.0;

/// Scores below this produce a high-severity violation
pub const HIGH_SEVERITY_THRESHOLD: f64 = 20.0;

/// Keyword coverage score for one framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceScore {
    /// Framework this score belongs to
    pub framework_id: String,
    /// Percentage of keywords found, rounded to two decimals
    pub score: f64,
}

impl ComplianceScore {
    /// Build a score from matched and total keyword counts
    ///
    /// A framework without keywords scores 0.
    pub fn from_counts(framework_id: impl Into<String>, matched: usize, total: usize) -> Self {
        Self {
            framework_id: framework_id.into(),
            score: round2(coverage_percent(matched, total)),
        }
    }
}

/// Unrounded keyword coverage in percent, 0 without keywords
pub(crate) fn coverage_percent(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64 * 100.0
    }
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Violation severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("Low"),
            Self::Medium => f.write_str("Medium"),
            Self::High => f.write_str("High"),
        }
    }
}

/// Flagged compliance gap derived from a low score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Framework the gap belongs to
    #[serde(rename = "framework")]
    pub framework_id: String,
    /// Human-readable description
    pub issue: String,
    /// Severity bucket
    pub severity: Severity,
}

impl Violation {
    /// Violation implied by keyword counts, if any
    ///
    /// Thresholds apply to the unrounded coverage, which is also what the
    /// issue text shows.
    pub fn from_coverage(
        framework_id: impl Into<String>,
        matched: usize,
        total: usize,
    ) -> Option<Self> {
        let percent = coverage_percent(matched, total);
        if percent >= VIOLATION_THRESHOLD {
            return None;
        }

        let severity = if percent < HIGH_SEVERITY_THRESHOLD {
            Severity::High
        } else {
            Severity::Medium
        };
        let shown = if total == 0 {
            "0".to_string()
        } else {
            format!("{percent:?}")
        };

        Some(Self {
            framework_id: framework_id.into(),
            issue: format!("Low keyword coverage ({shown}%)"),
            severity,
        })
    }
}

/// Combined output of one analysis
///
/// Built once by the engine and read-only afterwards. Serializes to the
/// export shape consumed by reporting collaborators:
/// `pii_detected`, `compliance_scores` (framework id to number),
/// `violations` and `ai_insights`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pii_detected: Vec<PiiEntity>,
    #[serde(with = "score_map")]
    compliance_scores: BTreeMap<String, ComplianceScore>,
    violations: Vec<Violation>,
    ai_insights: String,
}

impl AnalysisResult {
    pub(crate) fn new(
        pii_detected: Vec<PiiEntity>,
        compliance_scores: BTreeMap<String, ComplianceScore>,
        violations: Vec<Violation>,
        ai_insights: String,
    ) -> Self {
        Self {
            pii_detected,
            compliance_scores,
            violations,
            ai_insights,
        }
    }

    /// Detected PII entities in detection order
    pub fn pii_detected(&self) -> &[PiiEntity] {
        &self.pii_detected
    }

    /// Scores keyed by framework id
    pub fn compliance_scores(&self) -> &BTreeMap<String, ComplianceScore> {
        &self.compliance_scores
    }

    /// Score for a single framework
    pub fn score_for(&self, framework_id: &str) -> Option<f64> {
        self.compliance_scores.get(framework_id).map(|s| s.score)
    }

    /// Violations in framework selection order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Narrative commentary or sentinel text
    pub fn ai_insights(&self) -> &str {
        &self.ai_insights
    }

    /// Mean of all framework scores, 0 when nothing was scored
    pub fn overall_score(&self) -> f64 {
        if self.compliance_scores.is_empty() {
            return 0.0;
        }
        let total: f64 = self.compliance_scores.values().map(|s| s.score).sum();
        total / self.compliance_scores.len() as f64
    }

    /// Count of detected entities per label
    pub fn pii_by_label(&self) -> BTreeMap<PiiLabel, usize> {
        let mut counts = BTreeMap::new();
        for entity in &self.pii_detected {
            *counts.entry(entity.label).or_insert(0) += 1;
        }
        counts
    }

    /// Check if any PII was detected
    pub fn has_pii(&self) -> bool {
        !self.pii_detected.is_empty()
    }

    /// Check if any violation was flagged
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// Serializes the score map as `{ "GDPR": 25.0, ... }`
mod score_map {
    use super::ComplianceScore;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(
        scores: &BTreeMap<String, ComplianceScore>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        scores
            .iter()
            .map(|(id, score)| (id.as_str(), score.score))
            .collect::<BTreeMap<&str, f64>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<String, ComplianceScore>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(id, score)| {
                let value = ComplianceScore {
                    framework_id: id.clone(),
                    score,
                };
                (id, value)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::DetectionMethod;

    fn sample_result() -> AnalysisResult {
        let mut scores = BTreeMap::new();
        let gdpr = ComplianceScore::from_counts("GDPR", 3, 12);
        let soc2 = ComplianceScore::from_counts("SOC2", 0, 12);
        let violations = vec![
            Violation::from_coverage("GDPR", 3, 12).unwrap(),
            Violation::from_coverage("SOC2", 0, 12).unwrap(),
        ];
        scores.insert("GDPR".to_string(), gdpr);
        scores.insert("SOC2".to_string(), soc2);

        AnalysisResult::new(
            vec![PiiEntity::new(
                "john@example.com",
                PiiLabel::Email,
                8,
                24,
                DetectionMethod::Pattern,
            )],
            scores,
            violations,
            AI_INSIGHTS_UNAVAILABLE.to_string(),
        )
    }

    #[test]
    fn test_score_from_counts_rounds() {
        let score = ComplianceScore::from_counts("X", 1, 3);
        assert_eq!(score.score, 33.33);
        let score = ComplianceScore::from_counts("X", 2, 3);
        assert_eq!(score.score, 66.67);
    }

    #[test]
    fn test_empty_keyword_list_scores_zero() {
        let score = ComplianceScore::from_counts("EMPTY", 0, 0);
        assert_eq!(score.score, 0.0);
    }

    #[test]
    fn test_violation_issue_text() {
        let violation = Violation::from_coverage("GDPR", 3, 12).unwrap();
        assert_eq!(violation.issue, "Low keyword coverage (25.0%)");
        assert_eq!(violation.severity, Severity::Medium);

        let violation = Violation::from_coverage("GDPR", 1, 12).unwrap();
        assert_eq!(violation.issue, "Low keyword coverage (8.333333333333332%)");
        assert_eq!(violation.severity, Severity::High);

        let violation = Violation::from_coverage("EMPTY", 0, 0).unwrap();
        assert_eq!(violation.issue, "Low keyword coverage (0%)");
        assert_eq!(violation.severity, Severity::High);
    }

    #[test]
    fn test_threshold_uses_unrounded_coverage() {
        // 49.996% rounds to 50.00 but is still below the pass mark
        let score = ComplianceScore::from_counts("BIG", 12_499, 25_000);
        assert_eq!(score.score, 50.0);
        let violation = Violation::from_coverage("BIG", 12_499, 25_000).unwrap();
        assert_eq!(violation.severity, Severity::Medium);
        assert_eq!(violation.issue, "Low keyword coverage (49.996%)");

        // 19.9996% rounds to 20.00 but is still high severity
        let score = ComplianceScore::from_counts("BIG", 49_999, 250_000);
        assert_eq!(score.score, 20.0);
        let violation = Violation::from_coverage("BIG", 49_999, 250_000).unwrap();
        assert_eq!(violation.severity, Severity::High);

        assert!(Violation::from_coverage("BIG", 12_500, 25_000).is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample_result()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(value["compliance_scores"]["GDPR"], 25.0);
        assert_eq!(value["violations"][0]["framework"], "GDPR");
        assert_eq!(value["violations"][1]["severity"], "High");
        assert_eq!(value["pii_detected"][0]["label"], "EMAIL");
        assert_eq!(value["pii_detected"][0]["method"], "pattern");
        assert_eq!(value["ai_insights"], AI_INSIGHTS_UNAVAILABLE);
    }

    #[test]
    fn test_json_round_trip() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_overall_score_and_label_counts() {
        let result = sample_result();
        assert_eq!(result.overall_score(), 12.5);
        assert_eq!(result.pii_by_label().get(&PiiLabel::Email), Some(&1));
        assert!(result.has_pii());
        assert!(result.has_violations());
    }
}
