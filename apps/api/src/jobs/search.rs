use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::embedding::{Embedder, EmbeddingError, EmbeddingRole};
use crate::vector_store::{Metadata, ScoredRecord, VectorStore, VectorStoreError};

pub const DEFAULT_SEARCH_TOP_K: usize = 10;
pub const MAX_TOP_K: usize = 50;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    Store(#[from] VectorStoreError),
}

/// A stored job returned by a similarity query. Missing metadata fields are
/// replaced by display defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobMatch {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary: String,
    pub employment_type: String,
    pub experience_level: String,
    pub benefits: String,
    /// Similarity in [0, 1].
    pub score: f32,
}

impl From<ScoredRecord> for JobMatch {
    fn from(record: ScoredRecord) -> Self {
        let metadata = record.metadata.unwrap_or_default();
        let field = |key: &str, default: &str| field_or(&metadata, key, default);

        JobMatch {
            job_title: field("job_title", "Unknown"),
            company: field("company", "Unknown"),
            location: field("location", "Unknown"),
            description: field("description", "No description available"),
            requirements: field("requirements", ""),
            salary: field("salary", "Not specified"),
            employment_type: field("employment_type", "Not specified"),
            experience_level: field("experience_level", "Not specified"),
            benefits: field("benefits", ""),
            score: record.score.clamp(0.0, 1.0),
            id: record.id,
        }
    }
}

fn field_or(metadata: &Metadata, key: &str, default: &str) -> String {
    metadata
        .get(key)
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub matches: Vec<JobMatch>,
    /// The query was embedded with the non-semantic hash fallback, so the
    /// ranking carries no meaning.
    pub fallback_used: bool,
}

/// Embeds `text` as a query and returns the `top_k` nearest jobs.
pub async fn search_jobs(
    text: &str,
    top_k: usize,
    embedder: &Embedder,
    store: &dyn VectorStore,
) -> Result<SearchResults, SearchError> {
    let embedding = embedder.embed(text, EmbeddingRole::Query).await?;
    let records = store.query(&embedding.values, top_k, true).await?;
    info!("Job search returned {} of top {} matches", records.len(), top_k);

    Ok(SearchResults {
        matches: records.into_iter().map(JobMatch::from).collect(),
        fallback_used: embedding.fallback_used,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::embedding::FallbackPolicy;
    use crate::jobs::canonical::canonicalize;
    use crate::jobs::ingest::upload_job;
    use crate::test_support::{job, memory_store, FailingEmbeddings, TEST_DIMENSION};

    #[test]
    fn test_missing_metadata_gets_defaults() {
        let mut metadata = Metadata::new();
        metadata.insert("job_title".into(), "Engineer".into());
        metadata.insert("salary".into(), "".into());

        let m = JobMatch::from(ScoredRecord {
            id: "a".into(),
            score: 0.42,
            metadata: Some(metadata),
        });
        assert_eq!(m.job_title, "Engineer");
        assert_eq!(m.company, "Unknown");
        assert_eq!(m.description, "No description available");
        assert_eq!(m.salary, "Not specified");
        assert_eq!(m.requirements, "");
        assert!((m.score - 0.42).abs() < f32::EPSILON);
    }

    #[test]
    fn test_score_is_clamped() {
        let low = JobMatch::from(ScoredRecord {
            id: "a".into(),
            score: -0.3,
            metadata: None,
        });
        assert_eq!(low.score, 0.0);
    }

    #[tokio::test]
    async fn test_posting_is_top_match_for_its_own_text() {
        let store = memory_store();
        let embedder =
            Embedder::new(Arc::new(FailingEmbeddings), FallbackPolicy::Hash, TEST_DIMENSION);

        let target = job("Rust Engineer", "Ferrous");
        let uploaded = upload_job(&target, &embedder, &store).await.unwrap();
        upload_job(&job("Pastry Chef", "Bakery"), &embedder, &store)
            .await
            .unwrap();

        let results = search_jobs(&canonicalize(&target), 5, &embedder, &store)
            .await
            .unwrap();

        assert!(results.fallback_used);
        assert_eq!(results.matches.len(), 2);
        assert_eq!(results.matches[0].id, uploaded.id);
        assert!((results.matches[0].score - 1.0).abs() < 1e-5);
        assert_eq!(results.matches[0].job_title, "Rust Engineer");
    }
}
