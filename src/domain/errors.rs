//! Domain error types
//!
//! This module defines the error hierarchy for Compliscan.
//! Errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Compliscan error type
///
/// Used by configuration loading, document intake, reporting and the CLI.
/// The analysis core itself never returns it: every failure inside the engine
/// degrades to an empty or sentinel value instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Document cannot be read as text by this tool
    #[error("Unsupported document: {0}")]
    UnsupportedDocument(String),

    /// Language model collaborator errors
    #[error("Insight error: {0}")]
    Insight(#[from] InsightError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Language model errors
///
/// Errors raised while talking to the external language model.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum InsightError {
    /// No API key configured
    #[error("No API key configured for the language model")]
    MissingCredential,

    /// Failed to reach the endpoint
    #[error("Failed to connect to language model endpoint: {0}")]
    ConnectionFailed(String),

    /// Credential rejected (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Quota or rate limit exceeded (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body missing the expected completion
    #[error("Invalid response from language model: {0}")]
    InvalidResponse(String),

    /// Call exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl InsightError {
    /// Map an HTTP status and body to the matching error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::AuthenticationFailed(message),
            429 => Self::RateLimited(message),
            500..=599 => Self::ServerError { status, message },
            _ => Self::ClientError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScanError {
    fn from(err: toml::de::Error) -> Self {
        ScanError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_insight_error_conversion() {
        let insight_err = InsightError::ConnectionFailed("Network error".to_string());
        let scan_err: ScanError = insight_err.into();
        assert!(matches!(scan_err, ScanError::Insight(_)));
    }

    #[test]
    fn test_insight_error_from_status() {
        assert!(matches!(
            InsightError::from_status(401, "bad key"),
            InsightError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            InsightError::from_status(429, "quota"),
            InsightError::RateLimited(_)
        ));
        assert!(matches!(
            InsightError::from_status(503, "down"),
            InsightError::ServerError { status: 503, .. }
        ));
        assert!(matches!(
            InsightError::from_status(400, "bad request"),
            InsightError::ClientError { status: 400, .. }
        ));
    }

    #[test]
    fn test_server_error_display() {
        let err = InsightError::ServerError {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Server error: 502 - bad gateway");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let scan_err: ScanError = io_err.into();
        assert!(matches!(scan_err, ScanError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let scan_err: ScanError = json_err.into();
        assert!(matches!(scan_err, ScanError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let scan_err: ScanError = toml_err.into();
        assert!(matches!(scan_err, ScanError::Configuration(_)));
        assert!(scan_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_scan_error_implements_std_error() {
        let err = ScanError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
