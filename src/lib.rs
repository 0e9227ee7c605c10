//! medreport - medical report intake and summarization.
//!
//! Accepts a report as an image or PDF, extracts its text with Tesseract or
//! Poppler, and asks a generative model for a concise summary. Failed
//! generations are retried a bounded number of times before falling back to
//! a deterministic templated summary.

pub mod config;
pub mod document;
pub mod llm;
pub mod notify;
pub mod ocr;
pub mod services;

pub use config::Config;
pub use document::{ContentType, Document};
pub use notify::{ChannelNotifier, Notification, Notifier, Severity, TracingNotifier};
pub use services::{AnalysisResult, AnalysisSource, PipelineError, ReportAnalyzer, ReportPipeline};
