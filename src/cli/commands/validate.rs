//! Validate config command implementation
//!
//! Loads the configuration file, validates it and prints a summary. Unlike
//! `analyze`, a missing file is reported as an error.

use crate::config::{load_config, CompliscanConfig};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print!("{}", summary(&config));
        println!();
        Ok(0)
    }
}

fn summary(config: &CompliscanConfig) -> String {
    let analysis = &config.analysis;
    let insights = &config.insights;
    let api_key_configured = insights
        .api_key
        .as_ref()
        .is_some_and(|k| !k.expose_secret().is_empty());

    let frameworks = if analysis.frameworks.is_empty() {
        "all registered".to_string()
    } else {
        analysis.frameworks.join(", ")
    };

    let mut out = String::new();
    out.push_str("Configuration Summary:\n");
    out.push_str(&format!("  Log Level: {}\n", config.application.log_level));
    out.push_str(&format!("  Frameworks: {frameworks}\n"));
    if let Some(path) = &analysis.framework_library {
        out.push_str(&format!("  Framework Library: {}\n", path.display()));
    }
    if let Some(path) = &analysis.pattern_library {
        out.push_str(&format!("  Pattern Library: {}\n", path.display()));
    }
    out.push_str(&format!("  PII Detection: {}\n", analysis.include_pii));
    out.push_str(&format!(
        "  Statistical Recognizer: {} (max {} chars)\n",
        analysis.ner.enabled, analysis.ner.max_chars
    ));
    out.push_str(&format!("  AI Analysis: {}\n", analysis.include_ai_analysis));
    out.push_str(&format!("  Model: {} at {}\n", insights.model, insights.endpoint));
    out.push_str(&format!(
        "  API Key: {}\n",
        if api_key_configured {
            "configured"
        } else {
            "not set"
        }
    ));
    out.push_str(&format!(
        "  Audit Log: {}\n",
        if config.audit.enabled {
            config.audit.log_path.display().to_string()
        } else {
            "disabled".to_string()
        }
    ));
    out
}
