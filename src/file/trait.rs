use crate::models::ExtractOptions;
use anyhow::Result;
use std::path::Path;

/// Trait for turning one file format into raw text
///
/// Implementations are blocking; callers run them on the blocking pool.
/// A recoverable oddity inside the document (an unreadable page, an empty
/// row) must be skipped rather than returned as an error.
pub trait TextExtractor: Send + Sync {
    /// Extract raw text from a validated, readable file
    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<String>;

    /// Short identifier recorded as the extraction method
    fn name(&self) -> &'static str;
}
