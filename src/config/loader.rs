//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CompliscanConfig;
use crate::domain::errors::ScanError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CompliscanConfig
/// 4. Applies environment variable overrides (COMPLISCAN_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ScanError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use compliscan::config::loader::load_config;
///
/// let config = load_config("compliscan.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CompliscanConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScanError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ScanError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Loads configuration, falling back to defaults when the file is absent
///
/// Environment overrides and validation still apply to the defaults.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<CompliscanConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Configuration file not found, using defaults");
    let mut config = CompliscanConfig::default();
    finish(&mut config)?;
    Ok(config)
}

/// Parses TOML content with substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<CompliscanConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CompliscanConfig = toml::from_str(&contents)
        .map_err(|e| ScanError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut CompliscanConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        ScanError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ScanError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ScanError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using COMPLISCAN_* prefix
///
/// Variables follow the pattern `COMPLISCAN_<SECTION>_<KEY>`, for example
/// `COMPLISCAN_ANALYSIS_FRAMEWORKS` or `COMPLISCAN_INSIGHTS_MODEL`.
fn apply_env_overrides(config: &mut CompliscanConfig) -> Result<()> {
    if let Ok(val) = std::env::var("COMPLISCAN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    config
        .analysis
        .apply_env_overrides()
        .map_err(|e| ScanError::Configuration(format!("{e:#}")))?;
    config
        .insights
        .apply_env_overrides()
        .map_err(|e| ScanError::Configuration(format!("{e:#}")))?;
    config
        .audit
        .apply_env_overrides()
        .map_err(|e| ScanError::Configuration(format!("{e:#}")))?;

    if let Ok(val) = std::env::var("COMPLISCAN_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().map_err(|_| {
            ScanError::Configuration(format!(
                "Invalid COMPLISCAN_LOGGING_LOCAL_ENABLED value: {val}"
            ))
        })?;
    }
    if let Ok(val) = std::env::var("COMPLISCAN_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("COMPLISCAN_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
