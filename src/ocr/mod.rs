//! Text extraction from uploaded reports.
//!
//! Extracts text using:
//! - Tesseract OCR for image reports
//! - pdftotext (Poppler) for PDF reports, page by page
//!
//! Both tools are reached through small backend traits so the extractor can
//! be driven by fakes in tests.

mod backend;
mod extractor;
mod pdf;
mod tesseract;
mod tools;

pub use backend::{OcrBackend, OcrError, OcrResult};
pub use extractor::{ExtractionError, TextExtractor};
pub use pdf::{PdfTextBackend, PopplerBackend};
pub use tesseract::TesseractBackend;
pub use tools::check_binary;
