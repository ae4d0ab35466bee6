// Document upload handling: type gate plus DOCX → plain text extraction.
// Only Word Open XML documents are accepted; everything else is refused
// before any parsing is attempted.

use thiserror::Error;

use crate::errors::AppError;

pub mod docx;
pub mod handlers;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported upload type: {0}")]
    InvalidFileType(String),

    #[error("could not extract text: {0}")]
    Parse(String),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::InvalidFileType(received) => AppError::InvalidFileType(received),
            DocumentError::Parse(detail) => AppError::DocumentParse(detail),
        }
    }
}

/// True when either the MIME type or the file name marks a `.docx` upload.
pub fn is_docx_upload(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    let mime_matches = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(DOCX_MIME))
        .unwrap_or(false);

    let extension_matches = file_name
        .map(|name| name.to_ascii_lowercase().ends_with(".docx"))
        .unwrap_or(false);

    mime_matches || extension_matches
}

/// Type-checks an upload and, only if it is a DOCX, extracts its text.
pub fn extract_upload(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<String, DocumentError> {
    if !is_docx_upload(file_name, content_type) {
        let received = content_type.or(file_name).unwrap_or("unknown").to_string();
        return Err(DocumentError::InvalidFileType(received));
    }
    docx::extract_docx_text(bytes)
}
