//! Analysis orchestration: one entry point per user action.
//!
//! Pipeline: validate request → render prompt → call provider with the
//! expected schema → (run any requested tool, re-invoke) → validate result.
//! A single best-effort attempt: no retry, no timeout, nothing persisted.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::analysis::models::{
    AnalysisRequest, AnalysisResult, ImprovedResumeText, ImprovedSummary, ImprovedSummaryInput,
    Section, SummaryRewriteRequest,
};
use crate::analysis::prompts::{
    build_analysis_prompt, build_improved_summary_prompt, build_summary_rewrite_prompt,
    system_prompt, REVIEWER_PERSONA, WRITER_PERSONA,
};
use crate::analysis::schema::{
    analysis_result_schema, improved_resume_text_schema, improved_summary_schema,
    improved_summary_tool, parse_reply_json, require_text, validate_output, validate_request,
    validate_result, validate_rewrite_request, IMPROVED_SUMMARY_TOOL,
};
use crate::analysis::AnalysisError;
use crate::llm_client::{LlmError, ModelProvider, ModelReply, ModelRequest, ToolCall, ToolExchange};

/// Upper bound on tool invocations within one analysis call.
pub const MAX_TOOL_ROUNDS: usize = 3;

#[derive(Clone)]
pub struct ResumeAnalyzer {
    provider: Arc<dyn ModelProvider>,
}

impl ResumeAnalyzer {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    /// Full resume review. Empty text fails before the provider is touched.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let request = validate_request(request)?;

        let mut model_request = ModelRequest::new(
            system_prompt(REVIEWER_PERSONA),
            build_analysis_prompt(&request),
            analysis_result_schema(),
        )
        .with_tool(improved_summary_tool());

        let raw = self.run_with_tools(&mut model_request).await?;
        let result = validate_result(raw)?;

        debug!(
            score = result.resume_strength_score.as_str(),
            ats = result.ats_compatibility.as_str(),
            suggestions = Section::ALL
                .iter()
                .map(|s| result.section_wise_suggestions.get(*s).len())
                .sum::<usize>(),
            "Analysis validated"
        );
        Ok(result)
    }

    /// Rewrites the professional summary, or returns it unchanged if already strong.
    pub async fn improve_summary(&self, resume_text: &str) -> Result<ImprovedSummary, AnalysisError> {
        require_text("Resume text", resume_text)?;

        let model_request = ModelRequest::new(
            system_prompt(WRITER_PERSONA),
            build_improved_summary_prompt(resume_text),
            improved_summary_schema(),
        );
        let raw = self.run_once(&model_request).await?;
        validate_output(raw)
    }

    /// Splices `improved_summary` into the resume, leaving everything else as is.
    pub async fn rewrite_summary(
        &self,
        request: SummaryRewriteRequest,
    ) -> Result<ImprovedResumeText, AnalysisError> {
        validate_rewrite_request(&request)?;

        let model_request = ModelRequest::new(
            system_prompt(WRITER_PERSONA),
            build_summary_rewrite_prompt(&request),
            improved_resume_text_schema(),
        );
        let raw = self.run_once(&model_request).await?;
        validate_output(raw)
    }

    /// One round trip with no tools declared; a tool call here is a contract breach.
    async fn run_once(&self, request: &ModelRequest) -> Result<Value, AnalysisError> {
        match self.provider.generate(request).await? {
            ModelReply::Text(text) => parse_reply_json(&text),
            ModelReply::ToolCall(call) => Err(AnalysisError::SchemaMismatch(format!(
                "model called tool '{}' but none were declared",
                call.name
            ))),
        }
    }

    async fn run_with_tools(&self, request: &mut ModelRequest) -> Result<Value, AnalysisError> {
        for round in 0..=MAX_TOOL_ROUNDS {
            match self.provider.generate(request).await? {
                ModelReply::Text(text) => return parse_reply_json(&text),
                ModelReply::ToolCall(call) => {
                    if round == MAX_TOOL_ROUNDS {
                        break;
                    }
                    debug!(tool = %call.name, round, "Model requested tool");
                    let output = self.dispatch_tool(&call).await?;
                    request.exchanges.push(ToolExchange { call, output });
                }
            }
        }

        Err(LlmError::ToolLoop {
            rounds: MAX_TOOL_ROUNDS,
        }
        .into())
    }

    /// Runs a declared tool. Arguments and output are validated against the
    /// tool's own schema, independently of the top-level result.
    async fn dispatch_tool(&self, call: &ToolCall) -> Result<Value, AnalysisError> {
        match call.name.as_str() {
            IMPROVED_SUMMARY_TOOL => {
                let input: ImprovedSummaryInput = validate_output(call.args.clone())?;
                let output = self
                    .improve_summary(&input.resume_text)
                    .await
                    .map_err(|e| match e {
                        AnalysisError::InvalidInput { .. } => {
                            AnalysisError::SchemaMismatch(format!("tool arguments rejected: {e}"))
                        }
                        other => other,
                    })?;
                serde_json::to_value(output).map_err(|e| AnalysisError::SchemaMismatch(e.to_string()))
            }
            other => Err(AnalysisError::SchemaMismatch(format!(
                "model called undeclared tool '{other}'"
            ))),
        }
    }
}
