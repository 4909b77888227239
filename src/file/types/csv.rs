use crate::file::TextExtractor;
use crate::models::ExtractOptions;
use anyhow::{Context, Result};
use std::path::Path;

/// CSV file handler
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn new() -> Self {
        Self
    }

    fn delimiter_byte(delimiter: char) -> Result<u8> {
        if delimiter.is_ascii() {
            Ok(delimiter as u8)
        } else {
            anyhow::bail!("CSV delimiter must be a single ASCII character, got {:?}", delimiter)
        }
    }
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for CsvExtractor {
    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<String> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(Self::delimiter_byte(options.delimiter)?)
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let mut lines = Vec::new();
        for (index, record) in reader.byte_records().enumerate() {
            let record = record
                .with_context(|| format!("Failed to parse CSV row {}", index + 1))?;
            let fields: Vec<String> = record
                .iter()
                .map(|field| String::from_utf8_lossy(field).trim().to_string())
                .filter(|field| !field.is_empty())
                .collect();
            if !fields.is_empty() {
                lines.push(fields.join(" "));
            }
        }

        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
