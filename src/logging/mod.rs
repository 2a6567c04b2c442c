//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - JSON-formatted log files with rotation
//! - Console output
//!
//! Detected PII values are never written to logs.
//!
//! # Example
//!
//! ```no_run
//! use compliscan::logging::init_logging;
//! use compliscan::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of an analysis
///
/// # Example
///
/// ```no_run
/// use compliscan::log_analysis_start;
///
/// log_analysis_start!(1200, "GDPR,SOC2");
/// ```
#[macro_export]
macro_rules! log_analysis_start {
    ($chars:expr, $frameworks:expr) => {
        tracing::info!(
            chars = $chars,
            frameworks = %$frameworks,
            "Starting analysis"
        );
    };
}

/// Log the completion of an analysis
///
/// # Example
///
/// ```no_run
/// use compliscan::log_analysis_complete;
/// use std::time::Duration;
///
/// log_analysis_complete!(3, 1, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_analysis_complete {
    ($pii:expr, $violations:expr, $duration:expr) => {
        tracing::info!(
            pii_detected = $pii,
            violations = $violations,
            duration_ms = $duration.as_millis() as u64,
            "Analysis completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use compliscan::log_error_with_context;
/// use compliscan::domain::ScanError;
///
/// let error = ScanError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
