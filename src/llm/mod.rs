pub mod ollama;
pub mod prompts;
pub mod r#trait;

pub use ollama::{ModelInfo, OllamaClient};
pub use r#trait::Summarizer;
