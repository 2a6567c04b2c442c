//! Keyword-coverage compliance scoring

use super::frameworks::FrameworkRegistry;
use super::models::{ComplianceScore, Violation};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Scores and violations for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scorecard {
    /// Score per scored framework id
    pub scores: BTreeMap<String, ComplianceScore>,
    /// Violations in the order the frameworks were requested
    pub violations: Vec<Violation>,
}

/// Scores text against registered frameworks
///
/// A framework's score is the percentage of its keywords that occur in the
/// lowercased text as substrings. Matching is plain containment, so
/// `consent` also matches inside `consented`.
#[derive(Debug, Clone)]
pub struct ComplianceScorer {
    registry: Arc<FrameworkRegistry>,
}

impl ComplianceScorer {
    pub fn new(registry: Arc<FrameworkRegistry>) -> Self {
        Self { registry }
    }

    /// Scorer over the built-in framework table
    pub fn builtin() -> Self {
        Self::new(FrameworkRegistry::builtin())
    }

    pub fn registry(&self) -> &FrameworkRegistry {
        &self.registry
    }

    /// Score `text` against each requested framework
    ///
    /// Unknown ids are skipped with a warning. Repeated ids are scored once.
    pub fn score<S: AsRef<str>>(&self, text: &str, framework_ids: &[S]) -> Scorecard {
        let lowered = text.to_lowercase();
        let mut seen = HashSet::new();
        let mut card = Scorecard::default();

        for id in framework_ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                continue;
            }

            let Some(framework) = self.registry.lookup(id) else {
                tracing::warn!(framework = %id, "Unknown framework id, skipping");
                continue;
            };

            let matched = framework
                .keywords
                .iter()
                .filter(|keyword| lowered.contains(keyword.as_str()))
                .count();
            let total = framework.keywords.len();
            let score = ComplianceScore::from_counts(id, matched, total);

            tracing::debug!(
                framework = %id,
                matched = matched,
                total = total,
                score = score.score,
                "Scored framework"
            );

            if let Some(violation) = Violation::from_coverage(id, matched, total) {
                card.violations.push(violation);
            }
            card.scores.insert(id.to_string(), score);
        }

        card
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Severity;
    use proptest::prelude::*;
    use test_case::test_case;

    fn scorer() -> ComplianceScorer {
        ComplianceScorer::builtin()
    }

    fn registry_with(keywords: &[&str]) -> ComplianceScorer {
        let toml = format!(
            "[[framework]]\nid = \"TEST\"\nkeywords = [{}]\n",
            keywords
                .iter()
                .map(|k| format!("\"{k}\""))
                .collect::<Vec<_>>()
                .join(", ")
        );
        ComplianceScorer::new(Arc::new(FrameworkRegistry::from_toml(&toml).unwrap()))
    }

    #[test]
    fn test_gdpr_partial_coverage() {
        let card = scorer().score(
            "We process Personal Data with CONSENT under Article 6.",
            &["GDPR"],
        );
        // personal data, consent, article 6 out of 12
        assert_eq!(card.scores["GDPR"].score, 25.0);
        assert_eq!(card.violations.len(), 1);
        assert_eq!(card.violations[0].severity, Severity::Medium);
        assert_eq!(card.violations[0].issue, "Low keyword coverage (25.0%)");
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let card = scorer().score("", &["GDPR", "SOC2", "HIPAA", "RBI"]);
        assert_eq!(card.scores.len(), 4);
        assert!(card.scores.values().all(|s| s.score == 0.0));
        assert_eq!(card.violations.len(), 4);
        assert!(card.violations.iter().all(|v| v.severity == Severity::High));
    }

    #[test]
    fn test_unknown_framework_skipped() {
        let card = scorer().score("consent", &["GDPR", "PCI-DSS"]);
        assert_eq!(card.scores.len(), 1);
        assert!(card.scores.contains_key("GDPR"));
        assert!(card.violations.iter().all(|v| v.framework_id == "GDPR"));
    }

    #[test]
    fn test_duplicate_ids_scored_once() {
        let card = scorer().score("", &["RBI", "RBI"]);
        assert_eq!(card.scores.len(), 1);
        assert_eq!(card.violations.len(), 1);
    }

    #[test]
    fn test_violation_order_follows_request() {
        let card = scorer().score("", &["RBI", "GDPR"]);
        let order: Vec<_> = card.violations.iter().map(|v| v.framework_id.as_str()).collect();
        assert_eq!(order, vec!["RBI", "GDPR"]);
    }

    #[test]
    fn test_substring_containment() {
        let card = registry_with(&["consent"]).score("Users consented to tracking", &["TEST"]);
        assert_eq!(card.scores["TEST"].score, 100.0);
        assert!(card.violations.is_empty());
    }

    #[test]
    fn test_framework_without_keywords() {
        let card = registry_with(&[]).score("anything at all", &["TEST"]);
        assert_eq!(card.scores["TEST"].score, 0.0);
        assert_eq!(card.violations[0].severity, Severity::High);
    }

    #[test_case(0, Some(Severity::High) ; "nothing matched")]
    #[test_case(1, Some(Severity::High) ; "one of ten is high")]
    #[test_case(2, Some(Severity::Medium) ; "twenty percent is medium")]
    #[test_case(4, Some(Severity::Medium) ; "forty percent is medium")]
    #[test_case(5, None ; "half is compliant")]
    #[test_case(10, None ; "full coverage")]
    fn test_severity_thresholds(matched: usize, expected: Option<Severity>) {
        let keywords: Vec<String> = (0..10).map(|i| format!("term{i:02}")).collect();
        let refs: Vec<&str> = keywords.iter().map(String::as_str).collect();
        let text = keywords[..matched].join(" ");
        let card = registry_with(&refs).score(&text, &["TEST"]);

        let severity = card.violations.first().map(|v| v.severity);
        assert_eq!(severity, expected);
    }

    proptest! {
        #[test]
        fn score_stays_in_range(text in "\\PC{0,200}") {
            let card = scorer().score(&text, &["GDPR", "SOC2", "HIPAA", "RBI"]);
            for score in card.scores.values() {
                prop_assert!((0.0..=100.0).contains(&score.score));
            }
        }

        #[test]
        fn scoring_is_deterministic(text in "[a-zA-Z0-9 ]{0,120}") {
            let a = scorer().score(&text, &["GDPR", "HIPAA"]);
            let b = scorer().score(&text, &["GDPR", "HIPAA"]);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn violation_iff_below_fifty(text in "(consent|audit|privacy|breach|kyc|encryption| )*") {
            let card = scorer().score(&text, &["GDPR", "SOC2", "HIPAA", "RBI"]);
            for (id, score) in &card.scores {
                let flagged = card.violations.iter().any(|v| &v.framework_id == id);
                prop_assert_eq!(flagged, score.score < 50.0);
            }
        }
    }
}
