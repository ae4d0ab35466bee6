use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::documents::extract_upload;
use crate::errors::AppError;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub text: String,
    pub file_name: Option<String>,
}

/// POST /api/v1/documents/extract
///
/// Accepts one multipart `file` field holding a `.docx` and returns its plain
/// text. Nothing is written to disk.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;

        let upload_name = file_name.clone();
        let text = tokio::task::spawn_blocking(move || {
            extract_upload(upload_name.as_deref(), content_type.as_deref(), &bytes)
        })
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

        info!(chars = text.chars().count(), "Extracted text from DOCX upload");
        return Ok(Json(ExtractResponse { text, file_name }));
    }

    Err(AppError::Validation(format!(
        "Upload must include a '{FILE_FIELD}' field."
    )))
}
