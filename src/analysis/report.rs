//! Scan reports
//!
//! A [`ScanReport`] wraps one [`AnalysisResult`] with document metadata and
//! timing. The JSON export contains the analysis result only, in the shape
//! reporting collaborators consume; the console dashboard and the audit log
//! use the full envelope.

use crate::analysis::document::Document;
use crate::analysis::models::AnalysisResult;
use crate::domain::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable dashboard
    #[default]
    Console,
    /// Analysis result as pretty-printed JSON
    Json,
}

/// Document metadata carried in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// SHA-256 of the raw document bytes
    pub id: String,
    pub name: String,
    pub size_bytes: usize,
}

impl From<&Document> for DocumentSummary {
    fn from(document: &Document) -> Self {
        Self {
            id: document.fingerprint.clone(),
            name: document.name.clone(),
            size_bytes: document.size_bytes,
        }
    }
}

/// Analysis result with document metadata and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub document: DocumentSummary,
    /// Frameworks requested for this scan
    pub frameworks: Vec<String>,
    pub processing_time_ms: u64,
    pub result: AnalysisResult,
}

impl ScanReport {
    pub fn new(
        document: DocumentSummary,
        frameworks: Vec<String>,
        result: AnalysisResult,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            document,
            frameworks,
            processing_time_ms,
            result,
        }
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let result = &self.result;
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    COMPLIANCE SCAN REPORT                     \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📄 DOCUMENT\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Name:         {}\n", self.document.name));
        output.push_str(&format!("  Document ID:  {}\n", self.document.id));
        output.push_str(&format!("  Size:         {} bytes\n", self.document.size_bytes));
        output.push_str(&format!(
            "  Scanned At:   {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Overall Compliance Score:  {:.2}%\n",
            result.overall_score()
        ));
        output.push_str(&format!(
            "  Violations:                {}\n",
            result.violations().len()
        ));
        output.push_str(&format!(
            "  PII Entities Detected:     {}\n",
            result.pii_detected().len()
        ));
        output.push_str(&format!(
            "  Processing Time:           {} ms\n",
            self.processing_time_ms
        ));
        output.push('\n');

        if !result.compliance_scores().is_empty() {
            output.push_str("📋 FRAMEWORK SCORES\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (id, score) in result.compliance_scores() {
                let violation = result.violations().iter().find(|v| &v.framework_id == id);
                let status = match violation {
                    Some(v) => format!("⚠️  {}", v.severity),
                    None => "✅".to_string(),
                };
                output.push_str(&format!("  {:12} {:>7.2}%   {}\n", id, score.score, status));
            }
            output.push('\n');
        }

        let by_label = result.pii_by_label();
        if !by_label.is_empty() {
            output.push_str("🔍 PII DETECTIONS BY LABEL\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            let mut labels: Vec<_> = by_label.into_iter().collect();
            labels.sort_by(|a, b| b.1.cmp(&a.1));
            for (label, count) in labels {
                output.push_str(&format!("  {:30} {:>5}\n", label.as_str(), count));
            }
            output.push('\n');
        }

        if !result.violations().is_empty() {
            output.push_str("🚨 VIOLATIONS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for violation in result.violations() {
                output.push_str(&format!(
                    "  • [{}] {}: {}\n",
                    violation.severity, violation.framework_id, violation.issue
                ));
            }
            output.push('\n');
        }

        output.push_str("🤖 AI INSIGHTS\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        for line in result.ai_insights().lines() {
            output.push_str(&format!("  {line}\n"));
        }
        output.push('\n');

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Analysis result as pretty-printed JSON
    pub fn format_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.result)
    }

    /// Render in the requested format
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Console => Ok(self.format_console()),
            ReportFormat::Json => Ok(self.format_json()?),
        }
    }

    /// Write report to file
    pub fn write_to_file(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let content = self.render(format)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
