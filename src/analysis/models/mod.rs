//! Analysis data models

pub mod pii_entity;
pub mod result;

pub use pii_entity::{DetectionMethod, PiiEntity, PiiLabel};
pub use result::{
    AnalysisResult, ComplianceScore, Severity, Violation, AI_INSIGHTS_UNAVAILABLE,
    HIGH_SEVERITY_THRESHOLD, VIOLATION_THRESHOLD,
};
