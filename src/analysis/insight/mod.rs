//! Narrative insight generation
//!
//! Wraps an external language model behind [`LanguageModel`]. Generation
//! never fails from the caller's point of view: a missing credential yields
//! [`InsightOutcome::Disabled`] and any error or timeout yields
//! [`InsightOutcome::Failed`]. Both map to fixed texts in the result.

pub mod openai;
pub mod prompts;

use crate::analysis::config::InsightsConfig;
use crate::analysis::models::AI_INSIGHTS_UNAVAILABLE;
use crate::domain::InsightError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub use openai::OpenAiClient;

/// Prefix of the insight text when a configured model call fails
pub const AI_ANALYSIS_FAILED_PREFIX: &str = "AI Analysis failed: ";

/// External text-completion service
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one system and one user message, return the reply text
    async fn complete(&self, system: &str, user: &str) -> Result<String, InsightError>;

    fn model_name(&self) -> &str;
}

/// Result of one insight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightOutcome {
    /// Model reply
    Generated(String),
    /// No model configured
    Disabled,
    /// Model configured but the call failed
    Failed(String),
}

impl InsightOutcome {
    /// Text stored in `ai_insights`
    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) => text,
            Self::Disabled => AI_INSIGHTS_UNAVAILABLE.to_string(),
            Self::Failed(reason) => format!("{AI_ANALYSIS_FAILED_PREFIX}{reason}"),
        }
    }
}

/// Produces narrative summaries through an optional language model
#[derive(Clone)]
pub struct InsightGenerator {
    model: Option<Arc<dyn LanguageModel>>,
    max_content_chars: usize,
    timeout: Duration,
}

impl InsightGenerator {
    pub fn new(
        model: Option<Arc<dyn LanguageModel>>,
        max_content_chars: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            max_content_chars,
            timeout,
        }
    }

    /// Generator backed by the configured OpenAI-compatible endpoint
    ///
    /// Without an API key the generator is disabled.
    pub fn from_config(config: &InsightsConfig) -> Self {
        let model: Option<Arc<dyn LanguageModel>> = match OpenAiClient::new(config) {
            Ok(client) => Some(Arc::new(client)),
            Err(InsightError::MissingCredential) => {
                tracing::debug!("No language model API key configured");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build language model client");
                None
            }
        };

        Self::new(
            model,
            config.max_content_chars,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Generator that always reports [`InsightOutcome::Disabled`]
    pub fn disabled() -> Self {
        Self::new(
            None,
            prompts::DEFAULT_MAX_CONTENT_CHARS,
            Duration::from_secs(60),
        )
    }

    /// Whether a model is configured
    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Narrative summary text, or the sentinel/failure text
    pub async fn summarize<S: AsRef<str>>(&self, text: &str, frameworks: &[S]) -> String {
        self.generate(text, frameworks).await.into_text()
    }

    /// Ask the model for a narrative summary of `text`
    pub async fn generate<S: AsRef<str>>(&self, text: &str, frameworks: &[S]) -> InsightOutcome {
        let Some(model) = &self.model else {
            return InsightOutcome::Disabled;
        };

        let prompt = prompts::user_prompt(text, frameworks, self.max_content_chars);
        tracing::debug!(
            model = %model.model_name(),
            prompt_chars = prompt.chars().count(),
            "Requesting narrative insights"
        );

        match tokio::time::timeout(self.timeout, model.complete(prompts::SYSTEM_PROMPT, &prompt))
            .await
        {
            Ok(Ok(reply)) => InsightOutcome::Generated(reply),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Narrative insight request failed");
                InsightOutcome::Failed(e.to_string())
            }
            Err(_) => {
                let e = InsightError::Timeout(format!(
                    "no reply within {}ms",
                    self.timeout.as_millis()
                ));
                tracing::warn!(error = %e, "Narrative insight request timed out");
                InsightOutcome::Failed(e.to_string())
            }
        }
    }
}
