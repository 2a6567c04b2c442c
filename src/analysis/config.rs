//! Analysis configuration

use crate::analysis::detector::ner::DEFAULT_MAX_CHARS;
use crate::analysis::insight::prompts::DEFAULT_MAX_CONTENT_CHARS;
use crate::config::{secret_string_opt, SecretString};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Analysis pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Frameworks scored when none are requested explicitly; empty means all
    #[serde(default)]
    pub frameworks: Vec<String>,

    /// Run PII detection
    #[serde(default = "default_true")]
    pub include_pii: bool,

    /// Request a narrative summary when an API key is configured
    #[serde(default = "default_true")]
    pub include_ai_analysis: bool,

    /// Path to a framework library TOML file replacing the built-in table
    #[serde(default)]
    pub framework_library: Option<PathBuf>,

    /// Path to a pattern library TOML file replacing the built-in patterns
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Statistical recognizer settings
    #[serde(default)]
    pub ner: NerConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frameworks: Vec::new(),
            include_pii: true,
            include_ai_analysis: true,
            framework_library: None,
            pattern_library: None,
            ner: NerConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("framework_library", &self.framework_library),
            ("pattern_library", &self.pattern_library),
        ] {
            if let Some(path) = path {
                if !path.exists() {
                    anyhow::bail!("analysis.{name} file not found: {}", path.display());
                }
                if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                    anyhow::bail!("analysis.{name} must be a TOML file: {}", path.display());
                }
            }
        }

        if self.frameworks.iter().any(|f| f.trim().is_empty()) {
            anyhow::bail!("analysis.frameworks cannot contain empty ids");
        }

        self.ner.validate().context("Invalid analysis.ner configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("COMPLISCAN_ANALYSIS_FRAMEWORKS") {
            self.frameworks = split_list(&val);
        }

        if let Ok(val) = std::env::var("COMPLISCAN_ANALYSIS_INCLUDE_PII") {
            self.include_pii = val
                .parse()
                .context("Invalid COMPLISCAN_ANALYSIS_INCLUDE_PII value")?;
        }

        if let Ok(val) = std::env::var("COMPLISCAN_ANALYSIS_INCLUDE_AI_ANALYSIS") {
            self.include_ai_analysis = val
                .parse()
                .context("Invalid COMPLISCAN_ANALYSIS_INCLUDE_AI_ANALYSIS value")?;
        }

        if let Ok(val) = std::env::var("COMPLISCAN_ANALYSIS_FRAMEWORK_LIBRARY") {
            self.framework_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("COMPLISCAN_ANALYSIS_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        self.ner.apply_env_overrides()?;

        Ok(())
    }
}

/// Statistical recognizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerConfig {
    /// Enable the statistical recognizer
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Model file; the embedded model is used when unset
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Characters of input handed to the recognizer
    #[serde(default = "default_ner_max_chars")]
    pub max_chars: usize,
}

fn default_ner_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_path: None,
            max_chars: default_ner_max_chars(),
        }
    }
}

impl NerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            anyhow::bail!("max_chars must be > 0");
        }
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("COMPLISCAN_ANALYSIS_NER_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid COMPLISCAN_ANALYSIS_NER_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("COMPLISCAN_ANALYSIS_NER_MODEL_PATH") {
            self.model_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("COMPLISCAN_ANALYSIS_NER_MAX_CHARS") {
            self.max_chars = val
                .parse()
                .context("Invalid COMPLISCAN_ANALYSIS_NER_MAX_CHARS value")?;
        }

        Ok(())
    }
}

/// Language model settings for narrative insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; stored securely in memory and zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens in the reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Characters of document text included in the prompt
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_max_content_chars() -> usize {
    DEFAULT_MAX_CONTENT_CHARS
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_content_chars: default_max_content_chars(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl InsightsConfig {
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid insights.endpoint '{}'", self.endpoint))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!(
                "insights.endpoint must use http or https, got '{}'",
                url.scheme()
            );
        }

        if self.model.trim().is_empty() {
            anyhow::bail!("insights.model cannot be empty");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!(
                "insights.temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            );
        }
        if self.max_tokens == 0 {
            anyhow::bail!("insights.max_tokens must be > 0");
        }
        if self.max_content_chars == 0 {
            anyhow::bail!("insights.max_content_chars must be > 0");
        }
        if self.timeout_seconds == 0 {
            anyhow::bail!("insights.timeout_seconds must be > 0");
        }

        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// `OPENAI_API_KEY` is honoured when no key is configured.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("COMPLISCAN_INSIGHTS_ENDPOINT") {
            self.endpoint = val;
        }

        if let Ok(val) = std::env::var("COMPLISCAN_INSIGHTS_MODEL") {
            self.model = val;
        }

        if let Ok(val) = std::env::var("COMPLISCAN_INSIGHTS_API_KEY") {
            self.api_key = secret_string_opt(Some(val));
        } else if self.api_key.is_none() {
            self.api_key = secret_string_opt(std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(val) = std::env::var("COMPLISCAN_INSIGHTS_TEMPERATURE") {
            self.temperature = val
                .parse()
                .context("Invalid COMPLISCAN_INSIGHTS_TEMPERATURE value")?;
        }

        if let Ok(val) = std::env::var("COMPLISCAN_INSIGHTS_TIMEOUT_SECONDS") {
            self.timeout_seconds = val
                .parse()
                .context("Invalid COMPLISCAN_INSIGHTS_TIMEOUT_SECONDS value")?;
        }

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_true")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/compliscan.log")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path cannot be empty when audit is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("COMPLISCAN_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid COMPLISCAN_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("COMPLISCAN_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("COMPLISCAN_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid COMPLISCAN_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// Split a comma-separated list, dropping empty items
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
