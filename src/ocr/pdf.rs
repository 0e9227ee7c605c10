//! PDF text-layer extraction via Poppler's command-line tools.

use std::path::Path;
use std::process::Command;

use super::extractor::ExtractionError;
use super::tools::{check_binary, handle_cmd_output};

/// Source of per-page PDF text.
pub trait PdfTextBackend: Send + Sync {
    /// Short tool name for logs and `check` output.
    fn name(&self) -> &'static str;

    /// Check if the required tools are installed.
    fn is_available(&self) -> bool;

    /// Number of pages in the PDF.
    fn page_count(&self, pdf_path: &Path) -> Result<u32, ExtractionError>;

    /// Text of a single page (1-indexed).
    fn page_text(&self, pdf_path: &Path, page: u32) -> Result<String, ExtractionError>;
}

/// Poppler-based backend: `pdfinfo` for page count, `pdftotext` per page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PopplerBackend;

/// Parse the page count out of `pdfinfo` output.
fn parse_page_count(pdfinfo_stdout: &str) -> Option<u32> {
    pdfinfo_stdout
        .lines()
        .find(|line| line.starts_with("Pages:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
}

/// Strip the form feed pdftotext appends to every page, so concatenated
/// pages carry no separator.
fn clean_page_text(raw: &str) -> String {
    raw.trim_end_matches('\u{c}').to_string()
}

impl PdfTextBackend for PopplerBackend {
    fn name(&self) -> &'static str {
        "poppler"
    }

    fn is_available(&self) -> bool {
        check_binary("pdftotext") && check_binary("pdfinfo")
    }

    fn page_count(&self, pdf_path: &Path) -> Result<u32, ExtractionError> {
        let output = Command::new("pdfinfo").arg(pdf_path).output();
        let stdout = handle_cmd_output(output, "pdfinfo (install poppler-utils)", "pdfinfo failed")?;

        parse_page_count(&stdout).ok_or_else(|| {
            ExtractionError::ExtractionFailed("pdfinfo reported no page count".to_string())
        })
    }

    fn page_text(&self, pdf_path: &Path, page: u32) -> Result<String, ExtractionError> {
        let page_str = page.to_string();
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(pdf_path)
            .arg("-") // Output to stdout
            .output();

        let text = handle_cmd_output(
            output,
            "pdftotext (install poppler-utils)",
            &format!("pdftotext failed on page {}", page),
        )?;

        Ok(clean_page_text(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_count() {
        let info = "Title:          Lab results\nProducer:       scanner\nPages:          3\nEncrypted:      no\n";
        assert_eq!(parse_page_count(info), Some(3));
        assert_eq!(parse_page_count("Title: x\n"), None);
        assert_eq!(parse_page_count("Pages: many\n"), None);
    }

    #[test]
    fn test_page_form_feeds_are_removed() {
        let pages = [clean_page_text("page1\n\u{c}"), clean_page_text("page2\u{c}")];
        let joined = pages.concat();
        assert_eq!(joined, "page1\npage2");
        assert!(!joined.contains('\u{c}'));
        assert_eq!(clean_page_text("no feed"), "no feed");
    }
}
