//! End-to-end intake: extract text from a document, then analyze it.

use thiserror::Error;
use tracing::info;

use super::analysis::{AnalysisResult, ReportAnalyzer};
use crate::document::{ContentType, Document};
use crate::notify::Notifier;
use crate::ocr::TextExtractor;

/// Errors that stop the pipeline for a request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No text could be extracted from the {}", .0.display_name())]
    NoText(ContentType),
}

/// Runs extraction then analysis for one document at a time.
#[derive(Clone)]
pub struct ReportPipeline {
    extractor: TextExtractor,
    analyzer: ReportAnalyzer,
}

impl ReportPipeline {
    pub fn new(extractor: TextExtractor, analyzer: ReportAnalyzer) -> Self {
        Self {
            extractor,
            analyzer,
        }
    }

    /// Process a document.
    ///
    /// Extraction failures are reported through the notifier and halt the
    /// request; generation failures never do.
    pub async fn run(
        &self,
        document: &Document,
        notifier: &dyn Notifier,
    ) -> Result<AnalysisResult, PipelineError> {
        let content_type = document.content_type();

        notifier.info(&format!(
            "Extracting text from {}...",
            content_type.display_name()
        ));
        let text = self.extractor.extract_blocking(document, notifier).await;

        if text.trim().is_empty() {
            notifier.error(&format!(
                "No text could be extracted from the {}. Please try again with a clearer document.",
                content_type.display_name()
            ));
            return Err(PipelineError::NoText(content_type));
        }

        info!("Analyzing {} chars of {} text", text.len(), content_type);
        notifier.info("Analyzing the extracted text...");
        Ok(self.analyzer.analyze(&text, content_type, notifier).await)
    }
}
