use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::batch::parse_batch_file;
use crate::jobs::ingest::{upload_batch, upload_job, BatchReport, UploadedJob};
use crate::jobs::maintenance::{delete_all_jobs, test_connection, ConnectionReport, DeleteOutcome};
use crate::jobs::models::JobPosting;
use crate::jobs::search::{search_jobs, SearchResults, DEFAULT_SEARCH_TOP_K};
use crate::routes::upload::{read_file_field, TopKQuery};
use crate::state::AppState;
use crate::vector_store::IndexStats;

/// POST /api/v1/jobs
pub async fn handle_upload_job(
    State(state): State<AppState>,
    Json(job): Json<JobPosting>,
) -> Result<(StatusCode, Json<UploadedJob>), AppError> {
    let uploaded = upload_job(&job, &state.embedder, state.store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

/// POST /api/v1/jobs/batch
pub async fn handle_upload_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchReport>, AppError> {
    let upload = read_file_field(multipart, state.config.max_upload_bytes).await?;
    let jobs = parse_batch_file(&upload.file_name, &upload.bytes)?;
    info!("Batch file {} holds {} jobs", upload.file_name, jobs.len());

    let report = upload_batch(&jobs, &state.embedder, state.store.as_ref()).await;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub top_k: Option<usize>,
}

/// GET /api/v1/jobs/search?q=&top_k=
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResults>, AppError> {
    if params.q.trim().is_empty() {
        return Err(AppError::Validation("Search query must not be empty".to_string()));
    }
    let top_k = TopKQuery { top_k: params.top_k }.resolve(DEFAULT_SEARCH_TOP_K)?;

    let results = search_jobs(&params.q, top_k, &state.embedder, state.store.as_ref()).await?;
    Ok(Json(results))
}

/// GET /api/v1/index/stats
pub async fn handle_index_stats(
    State(state): State<AppState>,
) -> Result<Json<IndexStats>, AppError> {
    Ok(Json(state.store.stats().await?))
}

/// DELETE /api/v1/index
pub async fn handle_delete_all(
    State(state): State<AppState>,
) -> Result<Json<DeleteOutcome>, AppError> {
    Ok(Json(delete_all_jobs(state.store.as_ref()).await?))
}

/// GET /api/v1/connection-test
pub async fn handle_connection_test(State(state): State<AppState>) -> Json<ConnectionReport> {
    Json(
        test_connection(
            &state.config.index_name,
            &state.embedder,
            state.store.as_ref(),
        )
        .await,
    )
}
