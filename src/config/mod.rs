//! Configuration management for Compliscan.
//!
//! # Overview
//!
//! Compliscan reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `COMPLISCAN_*` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use compliscan::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("compliscan.toml")?;
//!
//! println!("Frameworks: {:?}", config.analysis.frameworks);
//! println!("Model: {}", config.insights.model);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`AnalysisConfig`] - Frameworks, PII detection and custom libraries
//! - [`InsightsConfig`] - Language model endpoint and credential
//! - [`AuditConfig`] - Audit trail
//! - [`LoggingConfig`] - Log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [analysis]
//! frameworks = ["GDPR", "SOC2"]
//! include_pii = true
//! include_ai_analysis = true
//!
//! [insights]
//! model = "gpt-4o"
//! api_key = "${OPENAI_API_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use crate::analysis::config::{AnalysisConfig, AuditConfig, InsightsConfig, NerConfig};
pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{ApplicationConfig, CompliscanConfig, LoggingConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
