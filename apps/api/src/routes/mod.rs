pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        // Job ingestion and search
        .route("/api/v1/jobs", post(jobs::handle_upload_job))
        .route("/api/v1/jobs/batch", post(jobs::handle_upload_batch))
        .route("/api/v1/jobs/search", get(jobs::handle_search))
        // Index maintenance
        .route("/api/v1/index/stats", get(jobs::handle_index_stats))
        .route("/api/v1/index", delete(jobs::handle_delete_all))
        .route("/api/v1/connection-test", get(jobs::handle_connection_test))
        // Resume matching
        .route("/api/v1/resumes/analyze", post(resume::handle_analyze))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
