//! Instruction prompt for report analysis.

/// Fixed instruction placed in front of the extracted report text.
pub const ANALYSIS_PROMPT: &str = "Analyze this medical report concisely. Provide key findings, diagnoses, and recommendations:\n\n";

/// Build the full prompt for a report. The text is not truncated.
pub fn build_prompt(text: &str) -> String {
    format!("{}{}", ANALYSIS_PROMPT, text)
}

/// Remove the prompt from the front of a completion when the model echoes it.
///
/// Results never contain the echoed prompt; only the continuation is kept.
pub fn strip_prompt_echo(output: &str, prompt: &str) -> String {
    match output.strip_prefix(prompt) {
        Some(rest) => rest.trim_start().to_string(),
        None => output.to_string(),
    }
}
