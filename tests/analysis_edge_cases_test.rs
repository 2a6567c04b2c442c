//! Edge case tests for detection and scoring

use compliscan::analysis::{
    config::NerConfig,
    detector::{ner::StatisticalDetector, regex::RegexDetector, HybridDetector, PiiDetector},
    models::{DetectionMethod, AI_INSIGHTS_UNAVAILABLE},
    AnalysisConfig, AnalysisEngine, AnalysisOptions, AuditConfig, InsightsConfig, PiiLabel,
    Severity,
};
use std::path::PathBuf;

fn engine() -> AnalysisEngine {
    AnalysisEngine::with_defaults().unwrap()
}

#[tokio::test]
async fn test_empty_input() {
    let result = engine()
        .analyze("", &AnalysisOptions::for_frameworks(["GDPR", "HIPAA"]))
        .await;

    assert!(result.pii_detected().is_empty());
    assert_eq!(result.score_for("GDPR"), Some(0.0));
    assert_eq!(result.score_for("HIPAA"), Some(0.0));
    assert_eq!(result.violations().len(), 2);
    assert!(result
        .violations()
        .iter()
        .all(|v| v.severity == Severity::High));
    assert_eq!(result.ai_insights(), AI_INSIGHTS_UNAVAILABLE);
}

#[tokio::test]
async fn test_whitespace_and_symbols_only() {
    let result = engine()
        .analyze("   \n\t --- *** ", &AnalysisOptions::for_frameworks(["SOC2"]))
        .await;
    assert!(result.pii_detected().is_empty());
    assert_eq!(result.score_for("SOC2"), Some(0.0));
}

#[tokio::test]
async fn test_only_unknown_frameworks() {
    let result = engine()
        .analyze(
            "personal data",
            &AnalysisOptions::for_frameworks(["PCI-DSS", "ISO27001"]),
        )
        .await;
    assert!(result.compliance_scores().is_empty());
    assert!(result.violations().is_empty());
    assert_eq!(result.overall_score(), 0.0);
}

#[tokio::test]
async fn test_case_insensitive_keyword_matching() {
    let result = engine()
        .analyze(
            "PERSONAL DATA, Data Subject, CONSENT",
            &AnalysisOptions::for_frameworks(["GDPR"]),
        )
        .await;
    assert_eq!(result.score_for("GDPR"), Some(25.0));
}

#[tokio::test]
async fn test_unicode_offsets_are_characters() {
    let text = "Café über naïve — écrivez à zoe@example.com";
    let result = engine()
        .analyze(text, &AnalysisOptions::for_frameworks(["GDPR"]))
        .await;

    let email = result
        .pii_detected()
        .iter()
        .find(|e| e.label == PiiLabel::Email)
        .expect("email detected");
    assert_eq!(email.span_in(text), email.text);
    assert!(email.end <= text.chars().count());
}

#[test]
fn test_overlapping_detections_are_kept() {
    let detector = HybridDetector::new(
        RegexDetector::new().unwrap(),
        StatisticalDetector::with_default_model(),
    );
    // The address local part is also a given name
    let text = "Please email JOHN@EXAMPLE.COM today.";
    let entities = detector.detect(text);

    let email = entities
        .iter()
        .find(|e| e.method == DetectionMethod::Pattern && e.label == PiiLabel::Email)
        .expect("email detected");
    let person = entities
        .iter()
        .find(|e| e.method == DetectionMethod::StatisticalModel && e.label == PiiLabel::Person)
        .expect("person detected");

    assert_eq!((email.start, email.end), (13, 29));
    assert_eq!(email.text, "JOHN@EXAMPLE.COM");
    assert_eq!((person.start, person.end), (13, 17));
    assert_eq!(person.text, "JOHN");
    assert!(email.overlaps(person));
    assert_eq!(entities.len(), 2);
}

#[test]
fn test_statistical_cap_limits_person_spans() {
    let padding = "x ".repeat(60_000);
    let text = format!("{padding}Dr. Alice Johnson wrote to alice@example.com");

    let detector = HybridDetector::new(
        RegexDetector::new().unwrap(),
        StatisticalDetector::from_config(&NerConfig::default()),
    );
    let entities = detector.detect(&text);

    // Patterns see the whole text, the recognizer only the first 100k chars
    assert!(entities.iter().any(|e| e.label == PiiLabel::Email));
    assert!(!entities.iter().any(|e| e.label == PiiLabel::Person));
}

#[tokio::test]
async fn test_missing_model_degrades_to_patterns() {
    let analysis = AnalysisConfig {
        ner: NerConfig {
            model_path: Some(PathBuf::from("/nonexistent/model.toml")),
            ..Default::default()
        },
        ..Default::default()
    };
    let engine =
        AnalysisEngine::from_config(&analysis, &InsightsConfig::default(), &AuditConfig::default())
            .unwrap();

    let result = engine
        .analyze(
            "Dr. Alice Johnson: alice@example.com",
            &AnalysisOptions::for_frameworks(["GDPR"]),
        )
        .await;

    assert!(result
        .pii_detected()
        .iter()
        .all(|e| e.method == DetectionMethod::Pattern));
    assert!(result
        .pii_detected()
        .iter()
        .any(|e| e.label == PiiLabel::Email));
}

#[test]
fn test_invalid_pattern_library_path() {
    let analysis = AnalysisConfig {
        pattern_library: Some(PathBuf::from("/nonexistent/path/patterns.toml")),
        ..Default::default()
    };
    let result =
        AnalysisEngine::from_config(&analysis, &InsightsConfig::default(), &AuditConfig::default());
    assert!(result.is_err(), "Should fail with invalid pattern library path");
}

#[test]
fn test_malformed_framework_library() {
    let library = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    std::fs::write(library.path(), "[[framework]]\nkeywords = 7\n").unwrap();

    let analysis = AnalysisConfig {
        framework_library: Some(library.path().to_path_buf()),
        ..Default::default()
    };
    let result =
        AnalysisEngine::from_config(&analysis, &InsightsConfig::default(), &AuditConfig::default());
    assert!(result.is_err());
}

#[tokio::test]
async fn test_concurrent_analyses_share_engine() {
    let engine = std::sync::Arc::new(engine());
    let mut handles = Vec::new();

    for i in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            let text = format!("Ticket {i}: write to user{i}@example.com about consent.");
            engine
                .analyze(&text, &AnalysisOptions::for_frameworks(["GDPR"]))
                .await
        }));
    }

    for handle in handles {
        let result = handle.await.unwrap();
        assert_eq!(result.pii_by_label().get(&PiiLabel::Email), Some(&1));
        assert_eq!(result.score_for("GDPR"), Some(8.33));
    }
}
