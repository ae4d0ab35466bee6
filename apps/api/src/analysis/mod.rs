// Resume analysis: request/result contract, prompt construction and the
// single-entry orchestration that talks to the model provider.
// All LLM calls go through llm_client; nothing here talks to the provider directly.

use thiserror::Error;

use crate::llm_client::LlmError;

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod sample;
pub mod schema;

pub use analyzer::ResumeAnalyzer;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Rejected before any provider call.
    #[error("{field} cannot be empty.")]
    InvalidInput { field: &'static str },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),
}
