//! Vector store adapter: upsert and nearest-neighbor query over one named
//! collection of metadata-tagged vectors.
//!
//! `AppState` holds an `Arc<dyn VectorStore>`; the backend is picked at startup
//! from `VECTOR_BACKEND`.

pub mod memory;
pub mod pinecone;
pub mod readiness;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryStore;
pub use pinecone::PineconeStore;
pub use readiness::{ensure_collection, ReadinessPolicy};

/// Flat string-keyed metadata attached to each vector. Size limits are the
/// caller's job; stores do not enforce them.
pub type Metadata = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cosine,
    Euclidean,
    Dotproduct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    pub dimension: usize,
    pub metric: Metric,
    pub cloud: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub dimension: usize,
    pub metric: Metric,
    pub ready: bool,
    /// Data-plane host, when the backend has one.
    pub host: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub id: String,
    pub score: f32,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexStats {
    pub total_count: u64,
    pub dimension: usize,
    pub fullness_ratio: f32,
    pub namespaces: BTreeMap<String, u64>,
}

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("collection '{0}' does not exist")]
    NotFound(String),

    #[error("collection '{name}' not ready after {waited:?}")]
    NotReady { name: String, waited: Duration },

    #[error("dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Returns `None` when the collection does not exist.
    async fn describe_collection(&self, name: &str)
        -> Result<Option<CollectionInfo>, VectorStoreError>;

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), VectorStoreError>;

    /// Insert-or-replace by id.
    async fn upsert(&self, record: VectorRecord) -> Result<(), VectorStoreError>;

    /// Nearest neighbors by the collection metric, highest score first. Returns
    /// fewer than `top_k` results when the collection holds fewer vectors.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ScoredRecord>, VectorStoreError>;

    async fn stats(&self) -> Result<IndexStats, VectorStoreError>;

    /// Removes every vector. Irreversible.
    async fn delete_all(&self) -> Result<(), VectorStoreError>;
}
