//! Service layer for medreport business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be used by the CLI or any other front-end that supplies
//! documents and renders notifications.

pub mod analysis;
pub mod pipeline;

pub use analysis::{
    fallback_summary, AnalysisResult, AnalysisSource, ReportAnalyzer, RetryPolicy, Sleeper,
    TokioSleeper,
};
pub use pipeline::{PipelineError, ReportPipeline};
