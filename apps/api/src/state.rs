use crate::analysis::ResumeAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request or per-user data: every request is independent.
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator wrapping the model provider (`Arc<dyn ModelProvider>` inside).
    pub analyzer: ResumeAnalyzer,
    pub config: Config,
}
