//! Two-stage document pipeline: extract, then summarize.
//!
//! The stages are fixed and run in order for each input. A failed extraction
//! ends the run before the model is contacted; a failed summary is returned
//! as-is. Nothing is retried.

use crate::file::{self, ExtractorRegistry};
use crate::llm::Summarizer;
use crate::models::{
    ExtractionInput, ExtractionResult, SummarizationRequest, SummarizationResult, SummaryOptions,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Extract,
    Summarize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => f.write_str("extract"),
            Stage::Summarize => f.write_str("summarize"),
        }
    }
}

/// Terminal state of one pipeline run
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Extraction failed; the summarizer was never called
    ExtractionFailed(ExtractionResult),
    /// Extraction succeeded; `summary` may still carry a model failure
    Summarized {
        extraction: ExtractionResult,
        summary: SummarizationResult,
    },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            PipelineOutcome::ExtractionFailed(_) => false,
            PipelineOutcome::Summarized { summary, .. } => summary.success,
        }
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            PipelineOutcome::ExtractionFailed(_) => Some(Stage::Extract),
            PipelineOutcome::Summarized { summary, .. } if !summary.success => {
                Some(Stage::Summarize)
            }
            PipelineOutcome::Summarized { .. } => None,
        }
    }

    pub fn extraction(&self) -> &ExtractionResult {
        match self {
            PipelineOutcome::ExtractionFailed(extraction) => extraction,
            PipelineOutcome::Summarized { extraction, .. } => extraction,
        }
    }

    /// The summary text, when the run got that far and the model answered
    pub fn summary_text(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Summarized { summary, .. } if summary.success => {
                Some(summary.summary_text.as_str())
            }
            _ => None,
        }
    }

    /// Failure message prefixed with the stage that produced it
    pub fn message(&self) -> Option<String> {
        let stage = self.failed_stage()?;
        let cause = match self {
            PipelineOutcome::ExtractionFailed(extraction) => extraction.error_message.clone(),
            PipelineOutcome::Summarized { summary, .. } => summary.error_message.clone(),
        };
        Some(format!(
            "{} stage failed: {}",
            stage,
            cause.unwrap_or_else(|| "unknown error".to_string())
        ))
    }
}

/// Runs extraction and summarization for one input at a time
///
/// Cheap to clone; the registry and summarizer are shared read-only.
#[derive(Clone)]
pub struct Pipeline {
    registry: Arc<ExtractorRegistry>,
    summarizer: Arc<dyn Summarizer>,
}

impl Pipeline {
    pub const STAGES: [Stage; 2] = [Stage::Extract, Stage::Summarize];

    pub fn new(registry: Arc<ExtractorRegistry>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            registry,
            summarizer,
        }
    }

    pub fn registry(&self) -> &Arc<ExtractorRegistry> {
        &self.registry
    }

    pub async fn run(&self, input: &ExtractionInput, options: &SummaryOptions) -> PipelineOutcome {
        let name = input.display_name();

        let extraction = file::extract(&self.registry, input).await;
        if !extraction.success {
            warn!(
                source = %name,
                stage = %Stage::Extract,
                "Pipeline stopped before summarization"
            );
            return PipelineOutcome::ExtractionFailed(extraction);
        }

        let summary = self.summarize_text(&extraction.content, options).await;
        if summary.success {
            info!(source = %name, "Pipeline completed");
        }

        PipelineOutcome::Summarized {
            extraction,
            summary,
        }
    }

    /// Summarize already-extracted text
    pub async fn summarize_text(&self, content: &str, options: &SummaryOptions) -> SummarizationResult {
        let request = SummarizationRequest::with_options(content, options);
        self.summarizer.summarize(&request).await
    }
}
