//! Document intake helpers
//!
//! Text extraction from PDF/DOCX is left to external tools; this module only
//! accepts plain text, normalizes whitespace and fingerprints the raw bytes.

use crate::domain::{Result, ScanError};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Extensions read directly as UTF-8 text
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "csv", "log"];

/// Extensions that need an external extractor
const BINARY_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "odt", "rtf", "xlsx"];

/// A document read from disk or stdin
#[derive(Debug, Clone)]
pub struct Document {
    /// File name, or `-` for stdin
    pub name: String,
    /// SHA-256 of the raw bytes
    pub fingerprint: String,
    /// Size of the raw bytes
    pub size_bytes: usize,
    /// Whitespace-normalized text
    pub text: String,
}

impl Document {
    /// Build a document from raw bytes
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let raw = std::str::from_utf8(bytes).map_err(|e| {
            ScanError::UnsupportedDocument(format!("{name} is not valid UTF-8 text: {e}"))
        })?;

        Ok(Self {
            fingerprint: fingerprint(bytes),
            size_bytes: bytes.len(),
            text: normalize_whitespace(raw),
            name,
        })
    }

    /// Read a plain-text document; `-` reads stdin
    pub fn read(path: &str) -> Result<Self> {
        if path == "-" {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            return Self::from_bytes("-", &bytes);
        }

        let file_path = Path::new(path);
        let extension = file_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if BINARY_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ScanError::UnsupportedDocument(format!(
                "{path}: .{extension} files must be converted to text first"
            )));
        }
        if !extension.is_empty() && !TEXT_EXTENSIONS.contains(&extension.as_str()) {
            tracing::warn!(path = %path, extension = %extension, "Unrecognized extension, reading as text");
        }

        let bytes = std::fs::read(file_path)
            .map_err(|e| ScanError::Io(format!("Failed to read {path}: {e}")))?;
        let name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();

        Self::from_bytes(name, &bytes)
    }
}

/// Collapse every whitespace run to one space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Hex SHA-256 digest of raw document bytes
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
