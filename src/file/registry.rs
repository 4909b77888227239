use crate::error::ExtractError;
use crate::file::types::{
    CsvExtractor, DocxExtractor, PdfExtractor, SpreadsheetExtractor, TxtExtractor,
};
use crate::file::TextExtractor;
use crate::models::ExtractOptions;
use crate::utils;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Dispatch table from file extension to extractor
///
/// Keys are lowercase and carry a leading dot (`.pdf`). Routing looks only at
/// the path suffix, never at file content. Build it once, wrap it in an
/// `Arc`, and share it read-only.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Create a registry with the production extractors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        let spreadsheet: Arc<dyn TextExtractor> = Arc::new(SpreadsheetExtractor::new());
        registry.register(".pdf", Arc::new(PdfExtractor::new()));
        registry.register(".txt", Arc::new(TxtExtractor::new()));
        registry.register(".xlsx", spreadsheet.clone());
        registry.register(".xls", spreadsheet);
        registry.register(".docx", Arc::new(DocxExtractor::new()));
        registry.register(".csv", Arc::new(CsvExtractor::new()));

        registry
    }

    /// Register an extractor; an existing mapping for the extension is replaced
    pub fn register(&mut self, extension: &str, extractor: Arc<dyn TextExtractor>) {
        self.extractors
            .insert(utils::normalize_extension(extension), extractor);
    }

    /// Find the extractor for an extension (with or without the dot, any case)
    pub fn get(&self, extension: &str) -> Option<Arc<dyn TextExtractor>> {
        self.extractors
            .get(&utils::normalize_extension(extension))
            .cloned()
    }

    /// Registered extensions, sorted
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.extractors.keys().cloned().collect();
        extensions.sort();
        extensions
    }

    /// Whether the path's suffix has an extractor
    pub fn supports(&self, path: &Path) -> bool {
        self.resolve(path).is_ok()
    }

    /// Look up the extractor for a path by its lowercased suffix
    pub fn resolve(&self, path: &Path) -> Result<Arc<dyn TextExtractor>, ExtractError> {
        let extension = utils::get_extension(path);
        if extension.is_empty() {
            return Err(ExtractError::UnsupportedFormat { extension });
        }
        self.extractors
            .get(&extension)
            .cloned()
            .ok_or(ExtractError::UnsupportedFormat { extension })
    }

    /// Run the registered extractor on a file
    ///
    /// Returns the raw text and the name of the extractor that produced it.
    /// This call blocks; async callers go through [`crate::file::extract_file`].
    pub fn dispatch(
        &self,
        path: &Path,
        options: &ExtractOptions,
    ) -> Result<(String, &'static str), ExtractError> {
        let extractor = self.resolve(path)?;
        let text = extractor
            .extract(path, options)
            .map_err(|source| ExtractError::Parse {
                extension: utils::get_extension(path),
                source,
            })?;
        Ok((text, extractor.name()))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}
