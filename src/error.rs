//! Error types for extraction and summarization.
//!
//! Two error enums mirror the two pipeline stages:
//!
//! * [`ExtractError`]: the document could not be turned into usable text
//!   (missing file, unknown extension, corrupt content, nothing but
//!   whitespace).
//! * [`SummarizeError`]: the model endpoint could not produce a summary
//!   (connection refused, timeout, bad status, malformed body).
//!
//! Neither is raised across the pipeline boundary. Both are folded into the
//! result objects in [`crate::models`], which carry the rendered message and
//! an [`ErrorKind`] for callers that need to branch on the failure class.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure class reported alongside a failed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Source is missing, not a regular file, or unreadable.
    FileValidation,
    /// No extractor is registered for the file extension.
    UnsupportedFormat,
    /// Extraction ran but produced no usable text.
    EmptyContent,
    /// The format parser rejected the file.
    Extraction,
    /// The model call failed.
    Summarization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::FileValidation => "file validation",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::EmptyContent => "empty content",
            ErrorKind::Extraction => "extraction",
            ErrorKind::Summarization => "summarization",
        };
        f.write_str(name)
    }
}

/// Errors produced while turning a document into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source path failed validation before any parsing happened.
    #[error("File validation failed for '{}': {reason}", path.display())]
    FileValidation { path: PathBuf, reason: String },

    /// No extractor is registered for the extension.
    #[error("No extractor registered for extension: {}", display_extension(extension))]
    UnsupportedFormat { extension: String },

    /// Extraction succeeded but the text is empty after whitespace normalization.
    #[error("No text content found in '{}'", path.display())]
    EmptyContent { path: PathBuf },

    /// The format parser failed on the file.
    #[error("Text extraction failed for {} file: {source:#}", display_extension(extension))]
    Parse {
        extension: String,
        #[source]
        source: anyhow::Error,
    },

    /// Writing uploaded bytes to a temporary file failed.
    #[error("Could not stage uploaded bytes in a temporary file: {0}")]
    TempFile(#[source] std::io::Error),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::FileValidation { .. } | ExtractError::TempFile(_) => {
                ErrorKind::FileValidation
            }
            ExtractError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ExtractError::EmptyContent { .. } => ErrorKind::EmptyContent,
            ExtractError::Parse { .. } => ErrorKind::Extraction,
        }
    }
}

fn display_extension(extension: &str) -> &str {
    if extension.is_empty() {
        "(none)"
    } else {
        extension
    }
}

/// Errors produced by a model endpoint call.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The request never completed (connection refused, DNS, reset).
    #[error("could not reach model endpoint at {url}: {detail}")]
    Transport { url: String, detail: String },

    /// The endpoint did not answer within the configured timeout.
    #[error("model request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// The endpoint answered with a non-2xx status.
    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not JSON or lacked the `response` field.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

impl SummarizeError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Summarization
    }
}
