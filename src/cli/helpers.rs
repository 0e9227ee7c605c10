//! Shared helper functions for CLI commands.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use medreport::llm::ModelHandle;
use medreport::ocr::TextExtractor;
use medreport::{Config, ContentType, Document, Notifier, ReportAnalyzer, ReportPipeline};

/// Renders pipeline notifications on the terminal.
///
/// Progress messages drive a spinner; warnings and errors are printed above it.
pub struct ConsoleNotifier {
    spinner: ProgressBar,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    /// Stop the spinner and clear its line.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    fn warning(&self, message: &str) {
        self.spinner
            .suspend(|| eprintln!("{} {}", style("!").yellow(), message));
    }

    fn error(&self, message: &str) {
        self.spinner
            .suspend(|| eprintln!("{} {}", style("✗").red(), message));
    }
}

/// Read a report from disk, detecting its type unless one is given.
pub fn read_document(path: &Path, content_type: Option<ContentType>) -> anyhow::Result<Document> {
    Document::from_file(path, content_type)
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
}

/// Build the pipeline from configuration. The model is loaded on first use.
pub fn build_pipeline(config: &Config) -> ReportPipeline {
    let model = Arc::new(ModelHandle::from_config(config.llm.clone()));
    ReportPipeline::new(
        TextExtractor::from_config(&config.ocr),
        ReportAnalyzer::from_config(model, config),
    )
}
