//! Generative model access for report analysis.

mod client;
mod handle;

pub use client::{
    build_prompt, strip_prompt_echo, LlmClient, LlmConfig, LlmError, LlmProvider, TextGenerator,
    ANALYSIS_PROMPT,
};
pub use handle::ModelHandle;
