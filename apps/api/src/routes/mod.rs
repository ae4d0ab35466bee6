pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::documents::handlers as documents;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis", post(analysis::handle_analyze))
        .route("/api/v1/analysis/demo", post(analysis::handle_demo))
        .route("/api/v1/analysis/sample", get(analysis::handle_sample))
        .route("/api/v1/job-roles", get(analysis::handle_job_roles))
        // Summary API
        .route(
            "/api/v1/summary/improve",
            post(analysis::handle_improve_summary),
        )
        .route(
            "/api/v1/summary/apply",
            post(analysis::handle_apply_summary),
        )
        // Documents API
        .route(
            "/api/v1/documents/extract",
            post(documents::handle_extract).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
