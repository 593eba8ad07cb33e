//! Ingestion pipeline: JobPosting → canonical text → embedding → upsert.

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::embedding::{Embedder, EmbeddingError, EmbeddingRole};
use crate::jobs::canonical::canonicalize;
use crate::jobs::metadata::job_metadata;
use crate::jobs::models::JobPosting;
use crate::vector_store::{VectorRecord, VectorStore, VectorStoreError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    Store(#[from] VectorStoreError),
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedJob {
    pub id: String,
    pub title: String,
    /// The stored vector is the non-semantic hash fallback.
    pub fallback_used: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedJob {
    /// 1-based position in the batch.
    pub index: usize,
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub uploaded: usize,
    pub failed: Vec<FailedJob>,
}

/// Record id: first 32 hex chars of SHA-256 over company, title and the
/// submission time. Identical postings submitted in the same microsecond collide.
pub fn job_id(job: &JobPosting, timestamp_micros: i64) -> String {
    let seed = format!("{}-{}-{}", job.company, job.title, timestamp_micros);
    let mut id = hex::encode(Sha256::digest(seed.as_bytes()));
    id.truncate(32);
    id
}

/// Uploads one posting. Either the record is stored or an error is returned;
/// nothing is written on failure.
pub async fn upload_job(
    job: &JobPosting,
    embedder: &Embedder,
    store: &dyn VectorStore,
) -> Result<UploadedJob, IngestError> {
    let missing = job.missing_required();
    if !missing.is_empty() {
        return Err(IngestError::MissingFields(missing));
    }

    let job_text = canonicalize(job);
    let embedding = embedder.embed(&job_text, EmbeddingRole::Document).await?;

    let id = job_id(job, Utc::now().timestamp_micros());
    store
        .upsert(VectorRecord {
            id: id.clone(),
            values: embedding.values,
            metadata: job_metadata(job, &job_text),
        })
        .await?;

    info!("Successfully uploaded job: {} ({id})", job.display_title());
    Ok(UploadedJob {
        id,
        title: job.title.clone(),
        fallback_used: embedding.fallback_used,
    })
}

/// Uploads postings one at a time. A failing record is recorded and the loop
/// moves on; this never returns early.
pub async fn upload_batch(
    jobs: &[JobPosting],
    embedder: &Embedder,
    store: &dyn VectorStore,
) -> BatchReport {
    let mut report = BatchReport {
        total: jobs.len(),
        ..Default::default()
    };

    for (i, job) in jobs.iter().enumerate() {
        info!("Processing job {} of {}", i + 1, jobs.len());
        match upload_job(job, embedder, store).await {
            Ok(_) => report.uploaded += 1,
            Err(e) => {
                warn!("Error uploading job {}: {e}", i + 1);
                report.failed.push(FailedJob {
                    index: i + 1,
                    title: job.display_title().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Batch finished: {} uploaded, {} failed",
        report.uploaded,
        report.failed.len()
    );
    report
}
