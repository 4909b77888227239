pub mod config;
pub mod constants;
pub mod error;
pub mod file;
pub mod llm;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use config::Config;
pub use error::{ErrorKind, ExtractError, SummarizeError};
pub use file::{ExtractorRegistry, TextExtractor};
pub use llm::{OllamaClient, Summarizer};
pub use models::{
    ExtractOptions, ExtractionInput, ExtractionResult, SummarizationRequest, SummarizationResult,
    SummaryOptions, SummaryStyle,
};
pub use pipeline::{Pipeline, PipelineOutcome, Stage};
