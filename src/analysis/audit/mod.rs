//! Audit logging module
//!
//! Provides a structured audit trail of scans. Detected PII values are
//! stored as SHA-256 hashes only.

pub mod logger;

pub use logger::AuditLogger;
