//! Report analysis command.

use std::path::Path;

use console::style;

use medreport::{Config, ContentType, PipelineError};

use crate::cli::helpers::{build_pipeline, read_document, ConsoleNotifier};

/// Extract, analyze and print a report summary.
pub async fn cmd_analyze(
    config: &Config,
    file: &Path,
    content_type: Option<ContentType>,
    json: bool,
) -> anyhow::Result<()> {
    let document = read_document(file, content_type)?;
    let pipeline = build_pipeline(config);

    let notifier = ConsoleNotifier::new();
    let outcome = pipeline.run(&document, &notifier).await;
    notifier.finish();

    let result = match outcome {
        Ok(result) => result,
        // Already reported through the notifier.
        Err(PipelineError::NoText(_)) => std::process::exit(1),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n{}", style("Analysis Results:").bold());
    println!("{}", "-".repeat(50));
    println!("{}", result);
    if result.is_fallback() {
        println!(
            "\n{} {}",
            style("!").yellow(),
            style("The model was unavailable; this is a generic fallback summary.").dim()
        );
    }
    Ok(())
}
