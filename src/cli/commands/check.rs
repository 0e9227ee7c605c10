//! Tool and model availability check.

use console::style;

use medreport::llm::LlmClient;
use medreport::ocr::TextExtractor;
use medreport::Config;

/// Check extraction tools and the configured model endpoint.
pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    println!("\n{}", style("Extraction Tools").bold());
    println!("{}", "-".repeat(50));

    let mut all_found = true;
    for (tool, available) in TextExtractor::check_tools() {
        let status = if available {
            style("✓ found").green()
        } else {
            all_found = false;
            style("✗ not found").red()
        };
        println!("  {:<15} {}", tool, status);
    }

    let extractor = TextExtractor::from_config(&config.ocr);
    let ocr = extractor.ocr_backend();
    let pdf = extractor.pdf_backend();
    for (name, ready) in [(ocr.name(), ocr.is_available()), (pdf.name(), pdf.is_available())] {
        let status = if ready {
            style("✓ ready").green()
        } else {
            style("✗ unavailable").red()
        };
        println!("  {:<15} {}", name, status);
    }
    println!("  {}", style(ocr.availability_hint()).dim());

    println!("\n{}", style("Model").bold());
    println!("{}", "-".repeat(50));
    println!("  {:<15} {:?}", "Provider", config.llm.provider);
    println!("  {:<15} {}", "Endpoint", config.llm.endpoint);
    println!("  {:<15} {}", "Model", config.llm.model);
    println!(
        "  {:<15} {} attempts, {}s apart",
        "Retry", config.retry.max_attempts, config.retry.delay_secs
    );

    let client = LlmClient::new(config.llm.clone())?;
    let reachable = client.is_available().await;
    let status = if reachable {
        style("✓ reachable").green()
    } else {
        style("✗ unreachable (fallback summaries will be used)").yellow()
    };
    println!("  {:<15} {}", "Status", status);

    println!();
    if all_found {
        println!("{} All extraction tools are available", style("✓").green());
    } else {
        println!(
            "{} Some tools are missing. Install with: apt install tesseract-ocr poppler-utils",
            style("!").yellow()
        );
    }

    Ok(())
}
