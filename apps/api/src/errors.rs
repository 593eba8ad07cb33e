use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::jobs::batch::BatchFileError;
use crate::jobs::ingest::IngestError;
use crate::jobs::search::SearchError;
use crate::resume::extract::ParseError;
use crate::resume::matching::MatchError;
use crate::vector_store::VectorStoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EMBEDDING_ERROR",
                    "The embedding service is unavailable".to_string(),
                )
            }
            AppError::VectorStore(VectorStoreError::NotFound(name)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "INDEX_NOT_FOUND",
                format!("Index '{name}' does not exist"),
            ),
            AppError::VectorStore(VectorStoreError::DimensionMismatch { expected, actual }) => {
                tracing::error!("Dimension mismatch: expected {expected}, got {actual}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DIMENSION_MISMATCH",
                    format!("Index expects {expected}-dimensional vectors, got {actual}"),
                )
            }
            AppError::VectorStore(e) => {
                tracing::error!("Vector store error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "VECTOR_STORE_ERROR",
                    "A vector store error occurred".to_string(),
                )
            }
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

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::MissingFields(_) => AppError::Validation(e.to_string()),
            IngestError::Embedding(e) => AppError::Embedding(e),
            IngestError::Store(e) => AppError::VectorStore(e),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Embedding(e) => AppError::Embedding(e),
            SearchError::Store(e) => AppError::VectorStore(e),
        }
    }
}

impl From<BatchFileError> for AppError {
    fn from(e: BatchFileError) -> Self {
        match e {
            BatchFileError::UnsupportedFormat(_) | BatchFileError::MissingColumns(_) => {
                AppError::Validation(e.to_string())
            }
            BatchFileError::Csv(_) | BatchFileError::Json(_) => {
                AppError::UnprocessableEntity(e.to_string())
            }
        }
    }
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::UnsupportedFormat(_) => AppError::Validation(e.to_string()),
            ParseError::Crashed(_) => AppError::Internal(anyhow::anyhow!(e)),
            _ => AppError::UnprocessableEntity(e.to_string()),
        }
    }
}

impl From<MatchError> for AppError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::Parse(e) => e.into(),
            MatchError::Embedding(e) => AppError::Embedding(e),
            MatchError::Store(e) => AppError::VectorStore(e),
        }
    }
}
