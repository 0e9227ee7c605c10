//! Configuration management for medreport using the prefer crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm::LlmConfig;

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Retry behavior for the generative model call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed wait between attempts, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub delay_secs: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    2
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_retry_delay_secs(),
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// - `MEDREPORT_MAX_ATTEMPTS`: total attempts (values below 1 are ignored)
    /// - `MEDREPORT_RETRY_DELAY_SECS`: seconds between attempts
    pub fn apply_overrides(mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        if let Some(n) = lookup("MEDREPORT_MAX_ATTEMPTS").and_then(|v| v.parse::<u32>().ok()) {
            if n >= 1 {
                self.max_attempts = n;
            }
        }
        if let Some(n) = lookup("MEDREPORT_RETRY_DELAY_SECS").and_then(|v| v.parse().ok()) {
            self.delay_secs = n;
        }
        self
    }
}

/// OCR settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language pack (e.g., "eng", "eng+deu").
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_ocr_language(),
        }
    }
}

impl OcrConfig {
    /// Apply overrides from a variable lookup (`OCR_LANGUAGE`).
    pub fn apply_overrides(mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        if let Some(lang) = lookup("OCR_LANGUAGE").filter(|s| !s.is_empty()) {
            self.language = lang;
        }
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    /// Path the config was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers medreport config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("medreport").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config file: {}", e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => {
                debug!("No medreport config file found, using defaults");
                Self::default_with_env()
            }
        }
    }

    /// Create a default config with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Apply environment variable overrides to every section.
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(&|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(self, lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            llm: self.llm.apply_overrides(lookup),
            retry: self.retry.apply_overrides(lookup),
            ocr: self.ocr.apply_overrides(lookup),
            source_path: self.source_path,
        }
    }
}
