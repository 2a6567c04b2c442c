//! Analyze command implementation
//!
//! Reads one plain-text document, runs the analysis engine and prints or
//! writes the report.

use crate::analysis::{AnalysisEngine, AnalysisOptions, Document, ReportFormat, ScanReport};
use crate::config::{load_config_or_default, CompliscanConfig};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Plain-text document to scan, or `-` for stdin
    pub input: String,

    /// Frameworks to score (comma-separated); defaults to the configured list, or all
    #[arg(short, long, value_delimiter = ',')]
    pub framework: Vec<String>,

    /// Skip PII detection
    #[arg(long)]
    pub no_pii: bool,

    /// Skip narrative insights
    #[arg(long)]
    pub no_ai: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "console")]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl AnalyzeArgs {
    /// Execute the analyze command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, "Starting analyze command");

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let options = self.options(&config);

        let engine =
            match AnalysisEngine::from_config(&config.analysis, &config.insights, &config.audit) {
                Ok(engine) => engine,
                Err(e) => {
                    crate::log_error_with_context!(e, "Failed to build analysis engine");
                    eprintln!("❌ {e:#}");
                    return Ok(2);
                }
            };

        let document = match Document::read(&self.input) {
            Ok(d) => d,
            Err(e) => {
                crate::log_error_with_context!(e, "Failed to read document");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let report = engine.scan(&document, &options).await;
        self.emit(&report)?;

        Ok(exit_code(&report))
    }

    /// Engine options from configuration with CLI overrides applied
    fn options(&self, config: &CompliscanConfig) -> AnalysisOptions {
        let mut options = AnalysisOptions::from(&config.analysis);

        if !self.framework.is_empty() {
            let ids: Vec<String> = self
                .framework
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            tracing::info!(frameworks = ?ids, "Overriding frameworks from CLI");
            options.frameworks = ids;
        }
        if self.no_pii {
            options.include_pii = false;
        }
        if self.no_ai {
            options.include_ai_analysis = false;
        }

        options
    }

    fn emit(&self, report: &ScanReport) -> anyhow::Result<()> {
        match &self.output {
            Some(path) => {
                report.write_to_file(path, self.format)?;
                eprintln!("✅ Report written to {}", path.display());
            }
            None => println!("{}", report.render(self.format)?),
        }
        Ok(())
    }
}

/// 1 when any violation was flagged, otherwise 0
fn exit_code(report: &ScanReport) -> i32 {
    if report.result.has_violations() {
        1
    } else {
        0
    }
}
