/// Constants used throughout docsum
/// This module centralizes default values shared by the config, the extractors and the CLI

/// Extensions accepted at the upload boundary (lowercase, leading dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".txt", ".xlsx", ".xls", ".csv"];

/// Files larger than this are extracted anyway, but a warning is logged
pub const LARGE_FILE_WARN_BYTES: u64 = 50 * 1024 * 1024;

/// Default Ollama server
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default model used for summaries
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";

/// Large local models can take a long time on a full document
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;

/// Advisory summary length passed to the prompt
pub const DEFAULT_MAX_WORDS: usize = 250;

/// Default CSV field delimiter
pub const DEFAULT_CSV_DELIMITER: char = ',';

/// Title written at the top of generated summary documents
pub const SUMMARY_DOCUMENT_TITLE: &str = "Paper Summary";
