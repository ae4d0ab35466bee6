//! Axum route handlers for the Analysis API.
//!
//! These are the action boundary: every `AnalysisError` is caught here once,
//! its detail logged, and only a short user-safe message is returned.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::models::{
    AnalysisRequest, AnalysisResult, ImprovedResumeText, ImprovedSummary, ScoreGauge,
    SummaryRewriteRequest,
};
use crate::analysis::sample::{DEMO_JOB_ROLE, SAMPLE_RESUME, SUGGESTED_JOB_ROLES};
use crate::analysis::{AnalysisError, ResumeAnalyzer};
use crate::errors::{AppError, AppJson};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub analysis: AnalysisResult,
    pub score_gauge: ScoreGauge,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(analysis: AnalysisResult) -> Self {
        let score_gauge = analysis.resume_strength_score.gauge();
        Self {
            analysis,
            score_gauge,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoRequest {
    #[serde(default)]
    pub job_role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoResponse {
    pub resume_text: &'static str,
    pub job_role: String,
    #[serde(flatten)]
    pub result: AnalysisResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleResponse {
    pub resume_text: &'static str,
    pub job_role: &'static str,
}

#[derive(Debug, Serialize)]
pub struct JobRolesResponse {
    pub roles: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveSummaryRequest {
    pub resume_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let analysis = get_resume_analysis(&state.analyzer, request).await?;
    Ok(Json(analysis.into()))
}

/// POST /api/v1/analysis/demo
///
/// Runs the bundled sample resume. The body is optional; it only overrides the role.
pub async fn handle_demo(
    State(state): State<AppState>,
    body: Option<Json<DemoRequest>>,
) -> Result<Json<DemoResponse>, AppError> {
    let job_role = body
        .and_then(|Json(demo)| demo.job_role)
        .filter(|role| !role.trim().is_empty())
        .unwrap_or_else(|| DEMO_JOB_ROLE.to_string());

    let analysis = get_resume_analysis(
        &state.analyzer,
        AnalysisRequest {
            resume_text: SAMPLE_RESUME.to_string(),
            job_role: Some(job_role.clone()),
        },
    )
    .await?;

    Ok(Json(DemoResponse {
        resume_text: SAMPLE_RESUME,
        job_role,
        result: analysis.into(),
    }))
}

/// GET /api/v1/analysis/sample
pub async fn handle_sample() -> Json<SampleResponse> {
    Json(SampleResponse {
        resume_text: SAMPLE_RESUME,
        job_role: DEMO_JOB_ROLE,
    })
}

/// GET /api/v1/job-roles
pub async fn handle_job_roles() -> Json<JobRolesResponse> {
    Json(JobRolesResponse {
        roles: &SUGGESTED_JOB_ROLES,
    })
}

/// POST /api/v1/summary/improve
pub async fn handle_improve_summary(
    State(state): State<AppState>,
    AppJson(request): AppJson<ImproveSummaryRequest>,
) -> Result<Json<ImprovedSummary>, AppError> {
    let span = info_span!("improve_summary", request_id = %Uuid::new_v4());
    async move {
        info!(resume_chars = request.resume_text.chars().count(), "Summary improvement requested");
        state
            .analyzer
            .improve_summary(&request.resume_text)
            .await
            .map(Json)
            .map_err(into_user_error)
    }
    .instrument(span)
    .await
}

/// POST /api/v1/summary/apply
pub async fn handle_apply_summary(
    State(state): State<AppState>,
    AppJson(request): AppJson<SummaryRewriteRequest>,
) -> Result<Json<ImprovedResumeText>, AppError> {
    let span = info_span!("apply_summary", request_id = %Uuid::new_v4());
    async move {
        info!(
            resume_chars = request.resume_text.chars().count(),
            summary_chars = request.improved_summary.chars().count(),
            "Summary rewrite requested"
        );
        state
            .analyzer
            .rewrite_summary(request)
            .await
            .map(Json)
            .map_err(into_user_error)
    }
    .instrument(span)
    .await
}

/// Runs one analysis inside a request-scoped span. Resume text is never logged.
pub async fn get_resume_analysis(
    analyzer: &ResumeAnalyzer,
    request: AnalysisRequest,
) -> Result<AnalysisResult, AppError> {
    let span = info_span!("resume_analysis", request_id = %Uuid::new_v4());
    async move {
        info!(
            resume_chars = request.resume_text.chars().count(),
            has_job_role = request.job_role.is_some(),
            "Analysis requested"
        );
        analyzer.analyze(request).await.map_err(into_user_error)
    }
    .instrument(span)
    .await
}

/// Empty input keeps its own message; every provider or schema failure
/// collapses into the generic analysis failure after being logged.
fn into_user_error(err: AnalysisError) -> AppError {
    match err {
        AnalysisError::InvalidInput { .. } => AppError::Validation(err.to_string()),
        other => {
            error!("Model round trip failed: {other}");
            AppError::AnalysisFailed
        }
    }
}
