//! Init command implementation
//!
//! Writes a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "compliscan.toml")]
    pub output: String,

    /// Include every setting with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Compliscan configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. For AI insights, set OPENAI_API_KEY in your environment or .env");
                println!("  3. Validate configuration: compliscan validate-config");
                println!("  4. Scan a document: compliscan analyze policy.txt");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Compliscan Configuration File

[application]
log_level = "info"

[analysis]
# Empty list scores every registered framework
frameworks = []
include_pii = true
include_ai_analysis = true

[insights]
model = "gpt-4o"
# api_key = "${OPENAI_API_KEY}"
"#
        .to_string()
    }

    /// Generate configuration with every setting documented
    fn generate_config_with_examples() -> String {
        r#"# Compliscan Configuration File
# PII detection and regulatory compliance scoring
#
# Values may reference environment variables with ${VAR_NAME}.
# Every setting can also be overridden with COMPLISCAN_<SECTION>_<KEY>.

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

[analysis]
# Frameworks to score; empty scores every registered framework
# Built-in: GDPR, SOC2, HIPAA, RBI
frameworks = ["GDPR", "SOC2", "HIPAA", "RBI"]

# Detect emails, phone numbers, SSNs, card numbers, URLs and person names
include_pii = true

# Ask the language model for a narrative summary (needs an API key)
include_ai_analysis = true

# Replace the built-in framework table
# framework_library = "./frameworks.toml"

# Replace the built-in PII pattern table
# pattern_library = "./pii_patterns.toml"

[analysis.ner]
# Statistical person-name recognizer
enabled = true

# Custom model file; the embedded English model is used when unset
# model_path = "./models/ner_en.toml"

# Characters of input handed to the recognizer
max_chars = 100000

[insights]
# OpenAI-compatible chat completions endpoint
endpoint = "https://api.openai.com/v1"
model = "gpt-4o"

# Falls back to OPENAI_API_KEY when unset
# api_key = "${OPENAI_API_KEY}"

temperature = 0.3
max_tokens = 1024

# Characters of document text included in the prompt
max_content_chars = 15000

timeout_seconds = 60

[audit]
# JSON-lines audit trail; PII values are stored as SHA-256 hashes only
enabled = false
log_path = "./audit/compliscan.log"
json_format = true

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"

# Rotation: daily, hourly, never
local_rotation = "daily"
"#
        .to_string()
    }
}
