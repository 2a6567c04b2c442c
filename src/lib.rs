// Compliscan - PII Detection and Compliance Scoring
// Copyright (c) 2025 Compliscan Contributors
// Licensed under the MIT License

//! # Compliscan - PII Detection and Compliance Scoring
//!
//! Compliscan scans document text for personally identifiable information
//! and measures how well it covers the vocabulary of regulatory frameworks
//! such as GDPR, SOC2, HIPAA and RBI.
//!
//! ## Overview
//!
//! This library provides:
//! - **Detection** of emails, phone numbers, SSNs, card numbers, URLs and
//!   person names, with character offsets into the analyzed text
//! - **Scoring** of keyword coverage per framework, with violations below 50%
//! - **Insights** from an optional OpenAI-compatible language model
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`analysis`] - Detection, scoring, insights and reports
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use compliscan::analysis::{AnalysisEngine, AnalysisOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = AnalysisEngine::with_defaults()?;
//!     let result = engine
//!         .analyze(
//!             "Contact john@example.com. We process personal data with consent.",
//!             &AnalysisOptions::for_frameworks(["GDPR"]),
//!         )
//!         .await;
//!
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! The analysis core never fails: unknown frameworks are skipped, a missing
//! statistical model degrades detection to patterns and language model
//! failures become text in `ai_insights`. Configuration, document intake and
//! reporting return [`domain::ScanError`].

pub mod analysis;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
