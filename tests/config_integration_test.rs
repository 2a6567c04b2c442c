//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interfering with each other.

use compliscan::analysis::{AnalysisEngine, AnalysisOptions, Severity};
use compliscan::config::{load_config, load_config_or_default};
use compliscan::domain::ScanError;
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ENV_VARS: &[&str] = &[
    "COMPLISCAN_APPLICATION_LOG_LEVEL",
    "COMPLISCAN_ANALYSIS_FRAMEWORKS",
    "COMPLISCAN_ANALYSIS_INCLUDE_PII",
    "COMPLISCAN_ANALYSIS_INCLUDE_AI_ANALYSIS",
    "COMPLISCAN_ANALYSIS_NER_ENABLED",
    "COMPLISCAN_ANALYSIS_NER_MAX_CHARS",
    "COMPLISCAN_INSIGHTS_MODEL",
    "COMPLISCAN_INSIGHTS_API_KEY",
    "COMPLISCAN_INSIGHTS_TEMPERATURE",
    "COMPLISCAN_AUDIT_ENABLED",
    "COMPLISCAN_LOGGING_LOCAL_ROTATION",
    "OPENAI_API_KEY",
    "TEST_COMPLISCAN_KEY",
];

fn cleanup_env_vars() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[analysis]
frameworks = ["GDPR", "SOC2"]
include_pii = true
include_ai_analysis = false

[analysis.ner]
enabled = false
max_chars = 20000

[insights]
endpoint = "https://llm.internal.example/v1"
model = "gpt-4o-mini"
api_key = "sk-config"
temperature = 0.1
max_tokens = 512
max_content_chars = 8000
timeout_seconds = 15

[audit]
enabled = true
log_path = "/tmp/compliscan/audit.log"
json_format = false

[logging]
local_enabled = false
local_path = "/tmp/compliscan/logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");

    assert_eq!(config.analysis.frameworks, vec!["GDPR", "SOC2"]);
    assert!(config.analysis.include_pii);
    assert!(!config.analysis.include_ai_analysis);
    assert!(!config.analysis.ner.enabled);
    assert_eq!(config.analysis.ner.max_chars, 20_000);

    assert_eq!(config.insights.endpoint, "https://llm.internal.example/v1");
    assert_eq!(config.insights.model, "gpt-4o-mini");
    assert_eq!(
        config.insights.api_key.as_ref().unwrap().expose_secret(),
        "sk-config"
    );
    assert_eq!(config.insights.max_tokens, 512);
    assert_eq!(config.insights.max_content_chars, 8000);
    assert_eq!(config.insights.timeout_seconds, 15);

    assert!(config.audit.enabled);
    assert_eq!(
        config.audit.log_path,
        PathBuf::from("/tmp/compliscan/audit.log")
    );
    assert!(!config.audit.json_format);

    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_empty_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert!(config.analysis.frameworks.is_empty());
    assert!(config.analysis.include_pii);
    assert!(config.analysis.include_ai_analysis);
    assert!(config.analysis.ner.enabled);
    assert_eq!(config.analysis.ner.max_chars, 100_000);
    assert_eq!(config.insights.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.insights.model, "gpt-4o");
    assert!(config.insights.api_key.is_none());
    assert_eq!(config.insights.max_content_chars, 15_000);
    assert!(!config.audit.enabled);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_COMPLISCAN_KEY", "sk-substituted");

    let file = write_config(
        r#"
[insights]
api_key = "${TEST_COMPLISCAN_KEY}"
"#,
    );
    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(
        config.insights.api_key.as_ref().unwrap().expose_secret(),
        "sk-substituted"
    );
    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[insights]
api_key = "${TEST_COMPLISCAN_KEY}"
"#,
    );
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ScanError::Configuration(_)));
    assert!(err.to_string().contains("TEST_COMPLISCAN_KEY"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("COMPLISCAN_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("COMPLISCAN_ANALYSIS_FRAMEWORKS", "HIPAA, RBI");
    std::env::set_var("COMPLISCAN_ANALYSIS_INCLUDE_PII", "false");
    std::env::set_var("COMPLISCAN_ANALYSIS_NER_MAX_CHARS", "500");
    std::env::set_var("COMPLISCAN_INSIGHTS_MODEL", "gpt-4.1");
    std::env::set_var("COMPLISCAN_AUDIT_ENABLED", "true");

    let file = write_config(
        r#"
[application]
log_level = "debug"

[analysis]
frameworks = ["GDPR"]
"#,
    );
    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.analysis.frameworks, vec!["HIPAA", "RBI"]);
    assert!(!config.analysis.include_pii);
    assert_eq!(config.analysis.ner.max_chars, 500);
    assert_eq!(config.insights.model, "gpt-4.1");
    assert!(config.audit.enabled);

    cleanup_env_vars();
}

#[test]
fn test_openai_api_key_fallback() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("OPENAI_API_KEY", "sk-from-openai-env");

    let config = load_config_or_default("/nonexistent/compliscan.toml").unwrap();
    assert_eq!(
        config.insights.api_key.as_ref().unwrap().expose_secret(),
        "sk-from-openai-env"
    );

    // A key in the file wins over OPENAI_API_KEY
    let file = write_config("[insights]\napi_key = \"sk-file\"\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(
        config.insights.api_key.as_ref().unwrap().expose_secret(),
        "sk-file"
    );

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_value() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("COMPLISCAN_ANALYSIS_INCLUDE_PII", "maybe");

    let result = load_config_or_default("/nonexistent/compliscan.toml");
    assert!(matches!(result, Err(ScanError::Configuration(_))));

    cleanup_env_vars();
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"loud\"\n",
        "[insights]\nendpoint = \"ftp://example.com\"\n",
        "[insights]\ntemperature = 3.0\n",
        "[insights]\ntimeout_seconds = 0\n",
        "[analysis.ner]\nmax_chars = 0\n",
        "[analysis]\nframeworks = [\"GDPR\", \"\"]\n",
        "[analysis]\nframework_library = \"/nonexistent/frameworks.toml\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for content in cases {
        let file = write_config(content);
        let result = load_config(file.path());
        assert!(
            matches!(result, Err(ScanError::Configuration(_))),
            "expected validation error for {content:?}"
        );
    }
}

#[tokio::test]
async fn test_engine_from_loaded_config() {
    let config = {
        let _lock = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();
        let file = write_config(
            r#"
[analysis]
frameworks = ["HIPAA"]
include_ai_analysis = false
"#,
        );
        load_config(file.path()).unwrap()
    };

    let engine =
        AnalysisEngine::from_config(&config.analysis, &config.insights, &config.audit).unwrap();
    let result = engine
        .analyze(
            "Patient privacy and protected health information are covered.",
            &AnalysisOptions::from(&config.analysis),
        )
        .await;

    assert_eq!(result.compliance_scores().len(), 1);
    assert_eq!(result.score_for("HIPAA"), Some(20.0));
    // 20 is below the pass mark but not below the High cut-off
    assert_eq!(result.violations().len(), 1);
    assert_eq!(result.violations()[0].framework_id, "HIPAA");
    assert_eq!(result.violations()[0].severity, Severity::Medium);
}
