use crate::models::{SummarizationRequest, SummarizationResult};

/// Trait for model providers that turn document text into a summary
///
/// Implementations never fail: transport and model errors are folded into a
/// failed [`SummarizationResult`] carrying a readable message.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `request.content` following its style and word guidance
    async fn summarize(&self, request: &SummarizationRequest) -> SummarizationResult;
}
