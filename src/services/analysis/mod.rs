//! Report analysis: prompt the model, retry on failure, fall back to a
//! templated summary when every attempt fails.

mod fallback;
mod retry;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

pub use fallback::{document_type_label, fallback_summary};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};

use crate::config::Config;
use crate::document::ContentType;
use crate::llm::{build_prompt, strip_prompt_echo, LlmError, ModelHandle};
use crate::notify::Notifier;

/// Where an analysis result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisSource {
    /// Generated by the model on the given attempt (1-based).
    Model { attempts: u32 },
    /// Produced by the fallback summarizer.
    Fallback,
}

/// Displayable analysis text plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub text: String,
    pub source: AnalysisSource,
}

impl AnalysisResult {
    pub fn is_fallback(&self) -> bool {
        self.source == AnalysisSource::Fallback
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Turns extracted report text into a summary.
///
/// `analyze` never fails: after the last failed attempt the fallback
/// summary is returned instead.
#[derive(Clone)]
pub struct ReportAnalyzer {
    model: Arc<ModelHandle>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    max_tokens: u32,
}

impl ReportAnalyzer {
    /// Create an analyzer with the default retry policy (3 attempts, 2s apart).
    pub fn new(model: Arc<ModelHandle>) -> Self {
        Self {
            model,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            max_tokens: 512,
        }
    }

    /// Create an analyzer from loaded configuration.
    pub fn from_config(model: Arc<ModelHandle>, config: &Config) -> Self {
        Self::new(model)
            .with_retry_policy(RetryPolicy::from(&config.retry))
            .with_max_tokens(config.llm.max_tokens)
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the delay strategy between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Analyze report text.
    pub async fn analyze(
        &self,
        text: &str,
        content_type: ContentType,
        notifier: &dyn Notifier,
    ) -> AnalysisResult {
        let prompt = build_prompt(text);
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            match self.generate(&prompt).await {
                Ok(output) => {
                    debug!("Generation succeeded on attempt {}", attempt);
                    return AnalysisResult {
                        text: output,
                        source: AnalysisSource::Model { attempts: attempt },
                    };
                }
                Err(e) if attempt < max_attempts => {
                    notifier.warning(&format!(
                        "An error occurred: {}. Retrying in {} seconds... (Attempt {}/{})",
                        e,
                        self.policy.delay().as_secs_f32(),
                        attempt,
                        max_attempts
                    ));
                    self.sleeper.sleep(self.policy.delay()).await;
                }
                Err(e) => {
                    notifier.error(&format!(
                        "Failed to analyze the report after {} attempts. Error: {}",
                        max_attempts, e
                    ));
                }
            }
        }

        info!("Using fallback analysis for {} report", content_type);
        notifier.info("Using fallback analysis method due to issues.");
        AnalysisResult {
            text: fallback_summary(text, content_type),
            source: AnalysisSource::Fallback,
        }
    }

    /// One generation attempt, with any prompt echo removed.
    ///
    /// A model that cannot be loaded, or that produces nothing beyond the
    /// prompt, counts as a failed attempt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let model = self.model.get()?;
        let output = model.generate(prompt, self.max_tokens).await?;
        let text = strip_prompt_echo(&output, prompt);
        if text.trim().is_empty() {
            return Err(LlmError::Parse("empty completion".to_string()));
        }
        Ok(text)
    }
}
