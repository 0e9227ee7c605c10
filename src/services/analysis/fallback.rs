//! Deterministic summary used when the model cannot produce one.

use crate::document::ContentType;

/// Document-type label shown in the fallback summary.
pub fn document_type_label(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Image => "Image",
        ContentType::Pdf => "Text-based medical report",
    }
}

/// Build the fallback summary for a report.
///
/// Pure and total: the word count is the number of whitespace-delimited
/// tokens, everything else is fixed text.
pub fn fallback_summary(text: &str, content_type: ContentType) -> String {
    let word_count = text.split_whitespace().count();
    format!(
        "Fallback Analysis:\n\
         1. Document Type: {}\n\
         2. Word Count: Approximately {} words\n\
         3. Content: The document appears to contain medical information, but detailed analysis is unavailable.\n\
         4. Recommendation: Please review the document manually or consult with a healthcare professional for accurate interpretation.",
        document_type_label(content_type),
        word_count
    )
}
