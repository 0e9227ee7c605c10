//! Text extraction from report documents using pdftotext and Tesseract.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use super::backend::{OcrBackend, OcrError};
use super::pdf::{PdfTextBackend, PopplerBackend};
use super::tesseract::TesseractBackend;
use super::tools::check_binary;
use crate::config::OcrConfig;
use crate::document::{ContentType, Document};
use crate::notify::Notifier;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn report_failure(content_type: ContentType, error: &dyn std::fmt::Display, notifier: &dyn Notifier) {
    notifier.error(&format!(
        "Failed to extract text from the {}. Error: {}",
        content_type.display_name(),
        error
    ));
}

/// Text extractor dispatching on the document's content type.
///
/// Images go through OCR and come back trimmed. PDFs are read page by page
/// and the page texts are concatenated in order with no separator; a failure
/// on any page fails the whole document.
#[derive(Clone)]
pub struct TextExtractor {
    ocr: Arc<dyn OcrBackend>,
    pdf: Arc<dyn PdfTextBackend>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor {
    /// Create a text extractor backed by Tesseract and Poppler.
    pub fn new() -> Self {
        Self::with_backends(Arc::new(TesseractBackend::new()), Arc::new(PopplerBackend))
    }

    /// Create a text extractor from OCR settings.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::with_backends(
            Arc::new(TesseractBackend::with_language(&config.language)),
            Arc::new(PopplerBackend),
        )
    }

    /// Create a text extractor with explicit backends.
    pub fn with_backends(ocr: Arc<dyn OcrBackend>, pdf: Arc<dyn PdfTextBackend>) -> Self {
        Self { ocr, pdf }
    }

    /// Extract text, reporting failures through the notifier.
    ///
    /// Extraction failure is not fatal here: any error produces exactly one
    /// error notification and an empty string.
    pub fn extract(&self, document: &Document, notifier: &dyn Notifier) -> String {
        match self.try_extract(document) {
            Ok(text) => text,
            Err(e) => {
                report_failure(document.content_type(), &e, notifier);
                String::new()
            }
        }
    }

    /// Extract text on the blocking thread pool.
    ///
    /// The external tools run as child processes, so the work is moved off
    /// the async runtime. Failures are reported exactly as in [`extract`].
    ///
    /// [`extract`]: TextExtractor::extract
    pub async fn extract_blocking(&self, document: &Document, notifier: &dyn Notifier) -> String {
        let extractor = self.clone();
        let owned = document.clone();
        match tokio::task::spawn_blocking(move || extractor.try_extract(&owned)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                report_failure(document.content_type(), &e, notifier);
                String::new()
            }
            Err(e) => {
                report_failure(document.content_type(), &e, notifier);
                String::new()
            }
        }
    }

    /// Extract text, propagating a typed error for either content type.
    pub fn try_extract(&self, document: &Document) -> Result<String, ExtractionError> {
        let content_type = document.content_type();
        // The external tools read from disk; the copy is removed on drop.
        let mut file = tempfile::Builder::new()
            .prefix("medreport-")
            .suffix(content_type.temp_suffix())
            .tempfile()?;
        file.write_all(document.bytes())?;
        file.flush()?;

        let text = match content_type {
            ContentType::Image => self.extract_image(file.path())?,
            ContentType::Pdf => self.extract_pdf(&file)?,
        };

        info!(
            "Extracted {} chars from {} document",
            text.len(),
            content_type
        );
        Ok(text)
    }

    /// Extract text from an image file using OCR.
    fn extract_image(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let result = self.ocr.ocr_image(image_path)?;
        debug!(
            "{} finished in {}ms",
            self.ocr.name(),
            result.processing_time_ms
        );
        Ok(result.text.trim().to_string())
    }

    /// Extract text from a PDF by concatenating every page's text layer.
    fn extract_pdf(&self, file: &NamedTempFile) -> Result<String, ExtractionError> {
        let path = file.path();
        let page_count = self.pdf.page_count(path)?;
        debug!("PDF has {} pages ({})", page_count, self.pdf.name());

        let mut text = String::new();
        for page in 1..=page_count {
            text.push_str(&self.pdf.page_text(path, page)?);
        }
        Ok(text)
    }

    /// Check if required tools are available.
    pub fn check_tools() -> Vec<(String, bool)> {
        ["tesseract", "pdftotext", "pdfinfo"]
            .iter()
            .map(|tool| (tool.to_string(), check_binary(tool)))
            .collect()
    }

    pub fn ocr_backend(&self) -> &dyn OcrBackend {
        self.ocr.as_ref()
    }

    pub fn pdf_backend(&self) -> &dyn PdfTextBackend {
        self.pdf.as_ref()
    }
}
