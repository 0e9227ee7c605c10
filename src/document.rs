//! Uploaded report documents and content-type detection.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content-type tag selecting the extraction strategy and fallback phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Scanned or photographed report (png, jpeg).
    Image,
    /// PDF report with a text layer.
    Pdf,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Image => "image",
            ContentType::Pdf => "pdf",
        }
    }

    /// Human-readable label used in progress messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ContentType::Image => "image",
            ContentType::Pdf => "PDF",
        }
    }

    /// Map a MIME type to a content type, accepting only the upload formats
    /// the intake supports.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(ContentType::Pdf),
            "image/png" | "image/jpeg" | "image/jpg" => Some(ContentType::Image),
            _ => None,
        }
    }

    /// Sniff the content type from magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        infer::get(bytes).and_then(|kind| Self::from_mime(kind.mime_type()))
    }

    /// Guess the content type from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        mime_guess::from_path(path)
            .iter()
            .find_map(|mime| Self::from_mime(mime.essence_str()))
    }

    /// File suffix for the ephemeral copy handed to external tools.
    pub(crate) fn temp_suffix(&self) -> &'static str {
        match self {
            ContentType::Image => ".png",
            ContentType::Pdf => ".pdf",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while building a document from caller input.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single uploaded report: raw bytes plus the content-type tag.
///
/// Documents live for one request only. The core borrows them and never
/// keeps a copy after a call returns.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    content_type: ContentType,
}

impl Document {
    pub fn new(bytes: Vec<u8>, content_type: ContentType) -> Self {
        Self {
            bytes,
            content_type,
        }
    }

    /// Build a document, sniffing the content type from the payload.
    pub fn detect(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        match ContentType::sniff(&bytes) {
            Some(content_type) => Ok(Self::new(bytes, content_type)),
            None => Err(DocumentError::UnsupportedFileType(
                infer::get(&bytes)
                    .map(|k| k.mime_type().to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            )),
        }
    }

    /// Read a document from disk.
    ///
    /// An explicit content type wins; otherwise magic bytes are checked
    /// first and the file extension second.
    pub fn from_file(path: &Path, content_type: Option<ContentType>) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path)?;
        let content_type = content_type
            .or_else(|| ContentType::sniff(&bytes))
            .or_else(|| ContentType::from_path(path))
            .ok_or_else(|| DocumentError::UnsupportedFileType(path.display().to_string()))?;
        Ok(Self::new(bytes, content_type))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }
}
