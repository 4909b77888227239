use crate::file::TextExtractor;
use crate::models::ExtractOptions;
use anyhow::{Context, Result};
use std::path::Path;

/// Plain text handler with a Latin-1 fallback for non-UTF-8 files
pub struct TxtExtractor;

impl TxtExtractor {
    pub fn new() -> Self {
        Self
    }

    /// UTF-8 first; otherwise every byte is read as the Latin-1 code point of the same value
    pub fn decode(bytes: Vec<u8>) -> String {
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
        }
    }
}

impl Default for TxtExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for TxtExtractor {
    fn extract(&self, path: &Path, _options: &ExtractOptions) -> Result<String> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read text file: {}", path.display()))?;
        Ok(Self::decode(bytes))
    }

    fn name(&self) -> &'static str {
        "text"
    }
}
