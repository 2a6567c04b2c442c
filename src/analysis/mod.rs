//! Compliance analysis
//!
//! This module scans document text for personally identifiable information
//! and scores it against regulatory frameworks.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Detection**: regex patterns plus a statistical recognizer for person names
//! - **Scoring**: keyword coverage per framework (GDPR, SOC2, HIPAA, RBI)
//! - **Insights**: optional narrative commentary from a language model
//! - **Audit**: JSON-lines trail with hashed PII values
//!
//! # Usage
//!
//! ```rust,ignore
//! use compliscan::analysis::{AnalysisEngine, AnalysisOptions};
//!
//! let engine = AnalysisEngine::with_defaults()?;
//! let result = engine.analyze(text, &AnalysisOptions::default()).await;
//! ```

pub mod audit;
pub mod config;
pub mod detector;
pub mod document;
pub mod engine;
pub mod frameworks;
pub mod insight;
pub mod models;
pub mod report;
pub mod scorer;

// Re-export main types
pub use config::{AnalysisConfig, AuditConfig, InsightsConfig, NerConfig};
pub use document::Document;
pub use engine::{AnalysisEngine, AnalysisOptions};
pub use frameworks::{FrameworkDefinition, FrameworkRegistry};
pub use models::{AnalysisResult, ComplianceScore, PiiEntity, PiiLabel, Severity, Violation};
pub use report::{ReportFormat, ScanReport};
