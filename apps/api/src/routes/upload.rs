use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::jobs::search::MAX_TOP_K;

/// Name of the multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Reads the `file` field of a multipart request. Other fields are ignored.
/// `max_bytes` is the router's body limit, quoted back when it is exceeded.
pub async fn read_file_field(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;
        return Ok(UploadedFile { file_name, bytes });
    }
    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

fn multipart_error(error: MultipartError, max_bytes: usize) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the {max_bytes} byte limit"))
    } else {
        AppError::Validation(format!("Invalid multipart body: {error}"))
    }
}

#[derive(Debug, Deserialize)]
pub struct TopKQuery {
    pub top_k: Option<usize>,
}

impl TopKQuery {
    /// Requested `top_k`, or `default` when absent. Must lie in `1..=50`.
    pub fn resolve(&self, default: usize) -> Result<usize, AppError> {
        let top_k = self.top_k.unwrap_or(default);
        if (1..=MAX_TOP_K).contains(&top_k) {
            Ok(top_k)
        } else {
            Err(AppError::Validation(format!(
                "top_k must be between 1 and {MAX_TOP_K}, got {top_k}"
            )))
        }
    }
}
