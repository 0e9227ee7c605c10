//! Text extraction command.

use std::path::Path;

use medreport::ocr::TextExtractor;
use medreport::{Config, ContentType};

use crate::cli::helpers::read_document;

/// Print the text extracted from a report.
pub fn cmd_extract(
    config: &Config,
    file: &Path,
    content_type: Option<ContentType>,
) -> anyhow::Result<()> {
    let document = read_document(file, content_type)?;
    let extractor = TextExtractor::from_config(&config.ocr);

    let text = extractor.try_extract(&document)?;
    if text.trim().is_empty() {
        anyhow::bail!(
            "No text could be extracted from the {}",
            document.content_type().display_name()
        );
    }

    println!("{}", text);
    Ok(())
}
