use axum::{
    extract::{Multipart, Query, State},
    Json,
};

use crate::errors::AppError;
use crate::resume::matching::{analyze_resume, MatchReport, MatchServices, DEFAULT_RESUME_TOP_K};
use crate::routes::upload::{read_file_field, TopKQuery};
use crate::state::AppState;

/// POST /api/v1/resumes/analyze?top_k=
pub async fn handle_analyze(
    State(state): State<AppState>,
    Query(params): Query<TopKQuery>,
    multipart: Multipart,
) -> Result<Json<MatchReport>, AppError> {
    let top_k = params.resolve(DEFAULT_RESUME_TOP_K)?;
    let upload = read_file_field(multipart, state.config.max_upload_bytes).await?;

    let services = MatchServices {
        embedder: &state.embedder,
        store: state.store.as_ref(),
        llm: state.llm.as_ref(),
    };
    let report = analyze_resume(services, upload.file_name, upload.bytes, top_k).await?;
    Ok(Json(report))
}
