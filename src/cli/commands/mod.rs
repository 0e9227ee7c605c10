//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod check;
mod extract;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use medreport::{Config, ContentType};

#[derive(Parser)]
#[command(name = "medreport")]
#[command(about = "Summarize medical reports from images or PDFs")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a report and summarize it
    Analyze {
        /// Image (png, jpg) or PDF report
        file: PathBuf,
        /// Content type (detected from the file when omitted)
        #[arg(short = 't', long = "type", value_enum)]
        content_type: Option<ContentType>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract and print a report's text without analyzing it
    Extract {
        /// Image (png, jpg) or PDF report
        file: PathBuf,
        /// Content type (detected from the file when omitted)
        #[arg(short = 't', long = "type", value_enum)]
        content_type: Option<ContentType>,
    },

    /// Check that OCR tools are installed and the model endpoint responds
    Check,
}

/// Load configuration from an explicit path or by discovery.
async fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from_path(&path).await?),
        None => Ok(Config::load().await),
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config).await?;

    match cli.command {
        Commands::Analyze {
            file,
            content_type,
            json,
        } => analyze::cmd_analyze(&config, &file, content_type, json).await,
        Commands::Extract { file, content_type } => {
            extract::cmd_extract(&config, &file, content_type)
        }
        Commands::Check => check::cmd_check(&config).await,
    }
}
