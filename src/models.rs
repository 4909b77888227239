use crate::constants::{DEFAULT_CSV_DELIMITER, DEFAULT_MAX_WORDS};
use crate::error::{ErrorKind, ExtractError, SummarizeError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Format-specific extraction parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Zero-based page indices to keep (PDF only). `None` keeps every page.
    pub pages: Option<BTreeSet<usize>>,
    /// Field delimiter (CSV only)
    pub delimiter: char,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pages: None,
            delimiter: DEFAULT_CSV_DELIMITER,
        }
    }
}

impl ExtractOptions {
    pub fn with_pages<I: IntoIterator<Item = usize>>(mut self, pages: I) -> Self {
        self.pages = Some(pages.into_iter().collect());
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Whether a zero-based page index passes the page filter
    pub fn includes_page(&self, index: usize) -> bool {
        self.pages.as_ref().map_or(true, |pages| pages.contains(&index))
    }
}

/// Where the document comes from
#[derive(Debug, Clone)]
pub enum ExtractionSource {
    /// A file already on disk
    Path(PathBuf),
    /// Uploaded bytes; the filename is only used to infer the format
    Bytes { data: Vec<u8>, filename: String },
}

/// One extraction request, consumed once
#[derive(Debug, Clone)]
pub struct ExtractionInput {
    pub source: ExtractionSource,
    pub options: ExtractOptions,
}

impl ExtractionInput {
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            source: ExtractionSource::Path(path.into()),
            options: ExtractOptions::default(),
        }
    }

    pub fn from_bytes<S: Into<String>>(data: Vec<u8>, filename: S) -> Self {
        Self {
            source: ExtractionSource::Bytes {
                data,
                filename: filename.into(),
            },
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Name used in log lines and messages
    pub fn display_name(&self) -> String {
        match &self.source {
            ExtractionSource::Path(path) => path.display().to_string(),
            ExtractionSource::Bytes { filename, .. } => filename.clone(),
        }
    }
}

/// Outcome of the extraction stage
///
/// Built only through [`ExtractionResult::success`] and
/// [`ExtractionResult::failure`], so a successful result always has
/// non-empty content and a failed one always has an error message and no
/// content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub content: String,
    pub metadata: Map<String, Value>,
    pub success: bool,
    pub error_message: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl ExtractionResult {
    /// Successful extraction. `content` must already be normalized and non-empty.
    pub fn success(content: String, metadata: Map<String, Value>) -> Self {
        debug_assert!(!content.trim().is_empty());
        Self {
            content,
            metadata,
            success: true,
            error_message: None,
            error_kind: None,
        }
    }

    pub fn failure(error: &ExtractError, metadata: Map<String, Value>) -> Self {
        Self {
            content: String::new(),
            metadata,
            success: false,
            error_message: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }

    pub fn insert_metadata<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.metadata.insert(key.into(), value.into());
    }
}

/// Summary output mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    #[default]
    Concise,
    Detailed,
    Bullets,
}

impl SummaryStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "concise",
            SummaryStyle::Detailed => "detailed",
            SummaryStyle::Bullets => "bullets",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concise" => Ok(SummaryStyle::Concise),
            "detailed" => Ok(SummaryStyle::Detailed),
            "bullets" | "bullet" => Ok(SummaryStyle::Bullets),
            other => Err(format!(
                "unknown summary style '{other}' (expected concise, detailed or bullets)"
            )),
        }
    }
}

/// Summary parameters that do not depend on the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    pub max_words: usize,
    pub style: SummaryStyle,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            style: SummaryStyle::default(),
        }
    }
}

/// Input to a [`crate::llm::Summarizer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizationRequest {
    pub content: String,
    /// Advisory word limit passed to the prompt; always at least 1
    pub max_words: usize,
    pub style: SummaryStyle,
}

impl SummarizationRequest {
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self::with_options(content, &SummaryOptions::default())
    }

    pub fn with_options<S: Into<String>>(content: S, options: &SummaryOptions) -> Self {
        Self {
            content: content.into(),
            max_words: options.max_words.max(1),
            style: options.style,
        }
    }

    pub fn max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words.max(1);
        self
    }

    pub fn style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }
}

/// Outcome of the summarization stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizationResult {
    pub summary_text: String,
    pub success: bool,
    pub error_message: Option<String>,
}

impl SummarizationResult {
    pub fn success<S: Into<String>>(summary_text: S) -> Self {
        Self {
            summary_text: summary_text.into(),
            success: true,
            error_message: None,
        }
    }

    pub fn failure(error: &SummarizeError) -> Self {
        Self {
            summary_text: String::new(),
            success: false,
            error_message: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extract_options_page_filter() {
        let all = ExtractOptions::default();
        assert!(all.includes_page(0));
        assert!(all.includes_page(99));

        let some = ExtractOptions::default().with_pages([0, 2]);
        assert!(some.includes_page(0));
        assert!(!some.includes_page(1));
        assert!(some.includes_page(2));
    }

    #[test]
    fn test_failure_result_has_message_and_no_content() {
        let error = ExtractError::EmptyContent {
            path: PathBuf::from("/tmp/blank.txt"),
        };
        let result = ExtractionResult::failure(&error, Map::new());
        assert!(!result.success);
        assert_eq!(result.content, "");
        assert!(result.error_message.unwrap().contains("No text content"));
        assert_eq!(result.error_kind, Some(ErrorKind::EmptyContent));
    }

    #[test]
    fn test_summary_style_parsing() {
        assert_eq!("concise".parse::<SummaryStyle>().unwrap(), SummaryStyle::Concise);
        assert_eq!("Detailed".parse::<SummaryStyle>().unwrap(), SummaryStyle::Detailed);
        assert_eq!("bullet".parse::<SummaryStyle>().unwrap(), SummaryStyle::Bullets);
        assert!("haiku".parse::<SummaryStyle>().is_err());
    }

    #[test]
    fn test_summarization_request_defaults() {
        let request = SummarizationRequest::new("text");
        assert_eq!(request.max_words, 250);
        assert_eq!(request.style, SummaryStyle::Concise);
    }

    #[test]
    fn test_summarization_request_clamps_zero_words() {
        let request = SummarizationRequest::new("text").max_words(0);
        assert_eq!(request.max_words, 1);
    }

    #[test]
    fn test_extraction_input_display_name() {
        let input = ExtractionInput::from_bytes(b"abc".to_vec(), "notes.txt");
        assert_eq!(input.display_name(), "notes.txt");
    }
}
