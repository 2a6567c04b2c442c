//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Compliscan using clap.
//!
//! Exit codes: 0 success, 1 violations found, 2 configuration or input
//! error, 5 fatal error.

pub mod commands;

use clap::{Parser, Subcommand};

/// Compliscan - PII detection and compliance scoring
#[derive(Parser, Debug)]
#[command(name = "compliscan")]
#[command(version, about, long_about = None)]
#[command(author = "Compliscan Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "compliscan.toml", env = "COMPLISCAN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COMPLISCAN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a plain-text document for PII and compliance gaps
    Analyze(commands::analyze::AnalyzeArgs),

    /// List registered compliance frameworks
    Frameworks(commands::frameworks::FrameworksArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
