/// Document handling utilities
///
/// This module provides utility functions for loading paper text from disk,
/// detecting the document kind, and collecting file metadata.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::warn;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Errors that can occur while loading a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Not a text document: {0}")]
    NotText(PathBuf),

    #[error("Failed to read document: {0}")]
    Io(#[from] io::Error),
}

/// Represents the kind of a document based on its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Plain text file (.txt, .text)
    PlainText,
    /// Markdown file (.md, .markdown)
    Markdown,
    /// Anything else; still read as text
    Unknown,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentKind::PlainText => "plain text",
            DocumentKind::Markdown => "markdown",
            DocumentKind::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Metadata about a loaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub file_name: String,
    pub file_size: u64,
    pub kind: DocumentKind,
    /// SHA-256 of the raw file bytes, hex encoded.
    pub sha256: String,
    /// Last modification time, RFC 3339, when the filesystem reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// Result of loading a document from disk
#[derive(Debug, Clone)]
pub struct DocumentContent {
    /// The document text
    pub text: String,
    /// Metadata about the file it came from
    pub metadata: DocumentMetadata,
}

/// Load a document's text and metadata with proper error handling.
///
/// # Arguments
///
/// * `path` - Path to the document
///
/// # Returns
///
/// A result containing the document text and metadata
pub fn read_document(path: &Path) -> Result<DocumentContent, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(DocumentError::NotAFile(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;

    // NUL bytes mark binary blobs (PDF scans, archives); those are rejected
    // rather than analyzed as garbage text.
    if bytes.contains(&0) {
        return Err(DocumentError::NotText(path.to_path_buf()));
    }

    let sha256 = sha256_hex(&bytes);

    // Papers are expected to be UTF-8; anything else is read lossily so a
    // stray byte cannot abort a whole batch.
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "Document {} is not valid UTF-8, replacing invalid sequences",
                path.display()
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    let kind = match detect_document_kind(path) {
        DocumentKind::Unknown => sniff_document_kind(&text),
        kind => kind,
    };

    let meta = fs::metadata(path)?;
    let modified = meta
        .modified()
        .ok()
        .map(|time| DateTime::<Local>::from(time).to_rfc3339());

    Ok(DocumentContent {
        text,
        metadata: DocumentMetadata {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            file_size: meta.len(),
            kind,
            sha256,
            modified,
        },
    })
}

/// Detect document kind from the file extension.
///
/// # Arguments
///
/// * `path` - Path to the document
///
/// # Returns
///
/// The detected document kind
pub fn detect_document_kind(path: &Path) -> DocumentKind {
    if let Some(extension) = path.extension() {
        let ext = extension.to_string_lossy().to_lowercase();

        match ext.as_str() {
            "txt" | "text" => return DocumentKind::PlainText,
            "md" | "markdown" => return DocumentKind::Markdown,
            _ => {}
        }
    }

    DocumentKind::Unknown
}

/// Fall back to content sniffing when the extension says nothing.
fn sniff_document_kind(text: &str) -> DocumentKind {
    if text.is_empty() {
        return DocumentKind::Unknown;
    }

    let trimmed = text.trim_start();
    if trimmed.starts_with('#') || text.contains("\n## ") || text.contains("](") {
        DocumentKind::Markdown
    } else {
        DocumentKind::PlainText
    }
}

/// Hex-encoded SHA-256 digest of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
