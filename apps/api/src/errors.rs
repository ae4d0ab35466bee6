use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// The only message an end user ever sees when a model round trip fails.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to get analysis from AI. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Document parse error: {0}")]
    DocumentParse(String),

    #[error("Analysis failed")]
    AnalysisFailed,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidFileType(received) => {
                tracing::warn!("Rejected upload of type {received}");
                (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "INVALID_FILE_TYPE",
                    "Invalid File Type. Please upload a .docx file.".to_string(),
                )
            }
            AppError::DocumentParse(detail) => {
                tracing::error!("Error parsing DOCX file: {detail}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "DOCUMENT_PARSE_ERROR",
                    "Could not parse the DOCX file. Please ensure it's a valid file.".to_string(),
                )
            }
            // Detail was logged where the failure was caught.
            AppError::AnalysisFailed => (
                StatusCode::BAD_GATEWAY,
                "ANALYSIS_FAILED",
                ANALYSIS_FAILED_MESSAGE.to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Malformed or incomplete JSON bodies get the same error envelope as every
/// other failure instead of axum's plain-text rejection.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejection is an `AppError`.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
