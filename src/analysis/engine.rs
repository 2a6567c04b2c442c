//! Analysis engine
//!
//! [`AnalysisEngine`] runs the PII detector, the compliance scorer and the
//! insight generator over one text and returns a single [`AnalysisResult`].
//!
//! # Examples
//!
//! ```no_run
//! use compliscan::analysis::{AnalysisEngine, AnalysisOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let engine = AnalysisEngine::with_defaults()?;
//! let options = AnalysisOptions::for_frameworks(["GDPR"]);
//!
//! let result = engine
//!     .analyze("Contact john@example.com about consent.", &options)
//!     .await;
//! println!("GDPR score: {:?}", result.score_for("GDPR"));
//! # Ok(())
//! # }
//! ```

use crate::analysis::{
    audit::AuditLogger,
    config::{AnalysisConfig, AuditConfig, InsightsConfig},
    detector::{
        ner::StatisticalDetector, patterns::PatternRegistry, regex::RegexDetector,
        HybridDetector, PiiDetector,
    },
    document::Document,
    frameworks::FrameworkRegistry,
    insight::InsightGenerator,
    models::{AnalysisResult, AI_INSIGHTS_UNAVAILABLE},
    report::{DocumentSummary, ScanReport},
    scorer::ComplianceScorer,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;

/// Per-call analysis options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Framework ids to score; empty means every registered framework
    pub frameworks: Vec<String>,
    pub include_pii: bool,
    pub include_ai_analysis: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            frameworks: Vec::new(),
            include_pii: true,
            include_ai_analysis: true,
        }
    }
}

impl AnalysisOptions {
    /// Default options restricted to the given frameworks
    pub fn for_frameworks<I, S>(frameworks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frameworks: frameworks.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

impl From<&AnalysisConfig> for AnalysisOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            frameworks: config.frameworks.clone(),
            include_pii: config.include_pii,
            include_ai_analysis: config.include_ai_analysis,
        }
    }
}

/// Orchestrates detection, scoring and narrative insights
///
/// Every collaborator is read-only after construction, so one engine can be
/// shared across tasks behind an `Arc`.
pub struct AnalysisEngine {
    detector: Arc<dyn PiiDetector>,
    scorer: ComplianceScorer,
    insights: InsightGenerator,
    audit_logger: Option<AuditLogger>,
}

impl AnalysisEngine {
    pub fn new(
        detector: Arc<dyn PiiDetector>,
        scorer: ComplianceScorer,
        insights: InsightGenerator,
    ) -> Self {
        Self {
            detector,
            scorer,
            insights,
            audit_logger: None,
        }
    }

    /// Attach an audit logger used by [`scan`](Self::scan)
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = if logger.is_enabled() {
            Some(logger)
        } else {
            None
        };
        self
    }

    /// Build an engine from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - A custom framework or pattern library cannot be loaded
    /// - The audit log directory cannot be created
    ///
    /// A statistical model that fails to load is not an error; detection
    /// falls back to patterns only.
    pub fn from_config(
        analysis: &AnalysisConfig,
        insights: &InsightsConfig,
        audit: &AuditConfig,
    ) -> Result<Self> {
        analysis
            .validate()
            .context("Invalid analysis configuration")?;

        let registry = match &analysis.framework_library {
            Some(path) => Arc::new(FrameworkRegistry::from_file(path)?),
            None => FrameworkRegistry::builtin(),
        };

        let pattern_detector = match &analysis.pattern_library {
            Some(path) => RegexDetector::with_registry(PatternRegistry::from_file(path)?),
            None => RegexDetector::new()?,
        };

        let statistical = StatisticalDetector::from_config(&analysis.ner);
        let detector = HybridDetector::new(pattern_detector, statistical);

        tracing::debug!(
            frameworks = registry.len(),
            patterns = detector.pattern_count(),
            statistical = detector.statistical_available(),
            "Analysis engine configured"
        );

        let engine = Self::new(
            Arc::new(detector),
            ComplianceScorer::new(registry),
            InsightGenerator::from_config(insights),
        );

        if audit.enabled {
            let logger =
                AuditLogger::from_config(audit).context("Failed to initialize audit logger")?;
            Ok(engine.with_audit_logger(logger))
        } else {
            Ok(engine)
        }
    }

    /// Engine with built-in tables, the embedded model and no language model
    pub fn with_defaults() -> Result<Self> {
        let detector = HybridDetector::new(
            RegexDetector::new()?,
            StatisticalDetector::with_default_model(),
        );
        Ok(Self::new(
            Arc::new(detector),
            ComplianceScorer::builtin(),
            InsightGenerator::disabled(),
        ))
    }

    /// Framework registry used for scoring
    pub fn registry(&self) -> &FrameworkRegistry {
        self.scorer.registry()
    }

    /// Requested ids, or every registered id when none were requested
    pub fn resolve_frameworks(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            self.registry().all_ids()
        } else {
            requested.to_vec()
        }
    }

    /// Analyze one text
    ///
    /// Never fails: unknown frameworks are skipped, an unavailable model
    /// degrades detection and insight failures become text.
    pub async fn analyze(&self, text: &str, options: &AnalysisOptions) -> AnalysisResult {
        let frameworks = self.resolve_frameworks(&options.frameworks);
        crate::log_analysis_start!(text.chars().count(), frameworks.join(","));
        let start = Instant::now();

        let pii_detected = if options.include_pii {
            self.detector.detect(text)
        } else {
            Vec::new()
        };

        let scorecard = self.scorer.score(text, &frameworks);

        let ai_insights = if options.include_ai_analysis && self.insights.is_available() {
            self.insights.summarize(text, &frameworks).await
        } else {
            AI_INSIGHTS_UNAVAILABLE.to_string()
        };

        let result = AnalysisResult::new(
            pii_detected,
            scorecard.scores,
            scorecard.violations,
            ai_insights,
        );

        crate::log_analysis_complete!(
            result.pii_detected().len(),
            result.violations().len(),
            start.elapsed()
        );

        result
    }

    /// Analyze a document and wrap the result in a report
    ///
    /// The report is appended to the audit log when one is attached. Audit
    /// failures are logged and do not affect the report.
    pub async fn scan(&self, document: &Document, options: &AnalysisOptions) -> ScanReport {
        let start = Instant::now();
        let result = self.analyze(&document.text, options).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let report = ScanReport::new(
            DocumentSummary::from(document),
            self.resolve_frameworks(&options.frameworks),
            result,
            elapsed_ms,
        );

        if let Some(logger) = &self.audit_logger {
            if let Err(e) = logger.log_scan(&report) {
                crate::log_error_with_context!(e, "Failed to write audit entry");
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::insight::LanguageModel;
    use crate::analysis::models::{PiiLabel, Severity};
    use crate::domain::InsightError;
    use async_trait::async_trait;
    use std::time::Duration;

    const SCENARIO: &str = "Contact john@example.com or call 555-123-4567. \
                            We process personal data with consent under Article 6.";

    struct FixedModel(&'static str);

    #[async_trait]
    impl LanguageModel for FixedModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, InsightError> {
            Ok(self.0.to_string())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct PanickingModel;

    #[async_trait]
    impl LanguageModel for PanickingModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, InsightError> {
            panic!("language model must not be called");
        }

        fn model_name(&self) -> &str {
            "panicking"
        }
    }

    fn engine_with_model(model: impl LanguageModel + 'static) -> AnalysisEngine {
        let detector = HybridDetector::new(
            RegexDetector::new().unwrap(),
            StatisticalDetector::with_default_model(),
        );
        AnalysisEngine::new(
            Arc::new(detector),
            ComplianceScorer::builtin(),
            InsightGenerator::new(Some(Arc::new(model)), 15_000, Duration::from_secs(5)),
        )
    }

    #[tokio::test]
    async fn test_scenario_gdpr() {
        let engine = AnalysisEngine::with_defaults().unwrap();
        let result = engine
            .analyze(SCENARIO, &AnalysisOptions::for_frameworks(["GDPR"]))
            .await;

        let labels: Vec<_> = result.pii_detected().iter().map(|e| e.label).collect();
        assert_eq!(
            labels.iter().filter(|l| **l == PiiLabel::Email).count(),
            1
        );
        assert_eq!(
            labels.iter().filter(|l| **l == PiiLabel::Phone).count(),
            1
        );
        assert_eq!(result.score_for("GDPR"), Some(25.0));
        assert_eq!(result.violations().len(), 1);
        assert_eq!(result.violations()[0].severity, Severity::Medium);
        assert_eq!(result.ai_insights(), AI_INSIGHTS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_default_frameworks_are_all_registered() {
        let engine = AnalysisEngine::with_defaults().unwrap();
        let result = engine.analyze(SCENARIO, &AnalysisOptions::default()).await;

        let expected = engine.registry().all_ids();
        assert_eq!(result.compliance_scores().len(), expected.len());
        for id in expected {
            assert!(result.score_for(&id).is_some(), "missing score for {id}");
        }
    }

    #[tokio::test]
    async fn test_pii_disabled() {
        let engine = AnalysisEngine::with_defaults().unwrap();
        let options = AnalysisOptions {
            include_pii: false,
            ..AnalysisOptions::for_frameworks(["GDPR"])
        };
        let result = engine.analyze(SCENARIO, &options).await;

        assert!(result.pii_detected().is_empty());
        assert_eq!(result.score_for("GDPR"), Some(25.0));
    }

    #[tokio::test]
    async fn test_empty_text() {
        let engine = AnalysisEngine::with_defaults().unwrap();
        let result = engine
            .analyze("", &AnalysisOptions::for_frameworks(["GDPR", "SOC2"]))
            .await;

        assert!(result.pii_detected().is_empty());
        assert_eq!(result.score_for("GDPR"), Some(0.0));
        assert_eq!(result.score_for("SOC2"), Some(0.0));
        assert_eq!(result.violations().len(), 2);
        assert!(result
            .violations()
            .iter()
            .all(|v| v.severity == Severity::High));
        assert_eq!(result.ai_insights(), AI_INSIGHTS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_model_reply_used_when_enabled() {
        let engine = engine_with_model(FixedModel("1. Key Compliance Risks: consent"));
        let result = engine
            .analyze(SCENARIO, &AnalysisOptions::for_frameworks(["GDPR"]))
            .await;
        assert_eq!(result.ai_insights(), "1. Key Compliance Risks: consent");
    }

    #[tokio::test]
    async fn test_model_not_called_when_ai_disabled() {
        let engine = engine_with_model(PanickingModel);
        let options = AnalysisOptions {
            include_ai_analysis: false,
            ..AnalysisOptions::for_frameworks(["GDPR"])
        };
        let result = engine.analyze(SCENARIO, &options).await;
        assert_eq!(result.ai_insights(), AI_INSIGHTS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unknown_framework_is_skipped() {
        let engine = AnalysisEngine::with_defaults().unwrap();
        let result = engine
            .analyze(SCENARIO, &AnalysisOptions::for_frameworks(["GDPR", "PCI"]))
            .await;
        assert_eq!(result.compliance_scores().len(), 1);
        assert!(result.score_for("PCI").is_none());
    }

    #[tokio::test]
    async fn test_scan_writes_audit_entry() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditConfig {
            enabled: true,
            log_path: dir.path().join("audit.log"),
            json_format: true,
        };
        let engine = AnalysisEngine::from_config(
            &AnalysisConfig::default(),
            &InsightsConfig::default(),
            &audit,
        )
        .unwrap();

        let document = Document::from_bytes("policy.txt", SCENARIO.as_bytes()).unwrap();
        let report = engine
            .scan(&document, &AnalysisOptions::for_frameworks(["GDPR"]))
            .await;

        assert_eq!(report.document.name, "policy.txt");
        assert_eq!(report.frameworks, vec!["GDPR".to_string()]);

        let content = std::fs::read_to_string(&audit.log_path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(!content.contains("john@example.com"));
    }

    #[test]
    fn test_options_from_config() {
        let config = AnalysisConfig {
            frameworks: vec!["HIPAA".to_string()],
            include_pii: false,
            ..Default::default()
        };
        let options = AnalysisOptions::from(&config);
        assert_eq!(options.frameworks, vec!["HIPAA".to_string()]);
        assert!(!options.include_pii);
        assert!(options.include_ai_analysis);
    }
}
