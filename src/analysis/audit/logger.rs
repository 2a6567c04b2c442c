//! Audit logger for scans

use crate::analysis::config::AuditConfig;
use crate::analysis::models::PiiEntity;
use crate::analysis::report::ScanReport;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    report_id: String,
    document_id: &'a str,
    document_name: &'a str,
    frameworks: &'a [String],
    scores: BTreeMap<&'a str, f64>,
    violations_count: usize,
    detections_count: usize,
    processing_time_ms: u64,
    detections: Vec<AuditDetection>,
}

/// Audit detection entry (with hashed PII)
#[derive(Debug, Serialize)]
struct AuditDetection {
    label: String,
    method: String,
    start: usize,
    end: usize,
    /// SHA-256 hash of the matched text (never log plaintext PII)
    value_hash: String,
}

/// Audit logger for scans
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        Self::new(config.log_path.clone(), config.json_format, config.enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one entry for a completed scan
    pub fn log_scan(&self, report: &ScanReport) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let result = &report.result;
        let entry = AuditLogEntry {
            timestamp: report.generated_at.to_rfc3339(),
            report_id: report.report_id.to_string(),
            document_id: &report.document.id,
            document_name: &report.document.name,
            frameworks: &report.frameworks,
            scores: result
                .compliance_scores()
                .iter()
                .map(|(id, s)| (id.as_str(), s.score))
                .collect(),
            violations_count: result.violations().len(),
            detections_count: result.pii_detected().len(),
            processing_time_ms: report.processing_time_ms,
            detections: result
                .pii_detected()
                .iter()
                .map(|e| self.create_audit_detection(e))
                .collect(),
        };

        self.write_entry(&entry)
    }

    /// Create an audit detection entry with hashed PII value
    fn create_audit_detection(&self, entity: &PiiEntity) -> AuditDetection {
        AuditDetection {
            label: entity.label.to_string(),
            method: entity.method.to_string(),
            start: entity.start,
            end: entity.end,
            value_hash: self.hash_pii_value(&entity.text),
        }
    }

    /// Hash a PII value using SHA-256
    fn hash_pii_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry<'_>) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Document: {} ({}) | Frameworks: {} | Violations: {} | Detections: {} | Time: {}ms",
                entry.timestamp,
                entry.document_name,
                entry.document_id,
                entry.frameworks.join(","),
                entry.violations_count,
                entry.detections_count,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}
