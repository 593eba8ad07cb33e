use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::vector_store::{
    CollectionInfo, CollectionSpec, IndexStats, Metadata, Metric, ScoredRecord, VectorRecord,
    VectorStore, VectorStoreError,
};

/// In-process vector store with brute-force cosine search.
///
/// Holds a single collection, like a `PineconeStore` bound to one index.
/// Collections are ready as soon as they are created.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryIndex>,
}

#[derive(Default)]
struct MemoryIndex {
    collection: Option<CollectionSpec>,
    records: HashMap<String, (Vec<f32>, Metadata)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose collection already exists.
    pub fn with_collection(spec: CollectionSpec) -> Self {
        Self {
            inner: RwLock::new(MemoryIndex {
                collection: Some(spec),
                records: HashMap::new(),
            }),
        }
    }
}

impl MemoryIndex {
    fn spec(&self) -> Result<&CollectionSpec, VectorStoreError> {
        self.collection
            .as_ref()
            .ok_or_else(|| VectorStoreError::NotFound("<memory>".to_string()))
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn describe_collection(
        &self,
        name: &str,
    ) -> Result<Option<CollectionInfo>, VectorStoreError> {
        let index = self.inner.read().await;
        Ok(index
            .collection
            .as_ref()
            .filter(|spec| spec.name == name)
            .map(|spec| CollectionInfo {
                name: spec.name.clone(),
                dimension: spec.dimension,
                metric: spec.metric,
                ready: true,
                host: None,
            }))
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), VectorStoreError> {
        let mut index = self.inner.write().await;
        if index.collection.is_none() {
            index.collection = Some(spec.clone());
        }
        Ok(())
    }

    async fn upsert(&self, record: VectorRecord) -> Result<(), VectorStoreError> {
        let mut index = self.inner.write().await;
        let expected = index.spec()?.dimension;
        if record.values.len() != expected {
            return Err(VectorStoreError::DimensionMismatch {
                expected,
                actual: record.values.len(),
            });
        }
        index
            .records
            .insert(record.id, (record.values, record.metadata));
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ScoredRecord>, VectorStoreError> {
        let index = self.inner.read().await;
        let spec = index.spec()?;
        if vector.len() != spec.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: spec.dimension,
                actual: vector.len(),
            });
        }

        let mut scored: Vec<ScoredRecord> = index
            .records
            .iter()
            .map(|(id, (values, metadata))| ScoredRecord {
                id: id.clone(),
                score: similarity(spec.metric, vector, values),
                metadata: include_metadata.then(|| metadata.clone()),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn stats(&self) -> Result<IndexStats, VectorStoreError> {
        let index = self.inner.read().await;
        let dimension = index.spec()?.dimension;
        let total = index.records.len() as u64;
        let mut namespaces = BTreeMap::new();
        if total > 0 {
            namespaces.insert(String::new(), total);
        }
        Ok(IndexStats {
            total_count: total,
            dimension,
            fullness_ratio: 0.0,
            namespaces,
        })
    }

    async fn delete_all(&self) -> Result<(), VectorStoreError> {
        let mut index = self.inner.write().await;
        index.spec()?;
        index.records.clear();
        Ok(())
    }
}

fn similarity(metric: Metric, a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match metric {
        Metric::Dotproduct => dot,
        Metric::Euclidean => -a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
        Metric::Cosine => {
            let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm_a == 0.0 || norm_b == 0.0 {
                0.0
            } else {
                dot / (norm_a * norm_b)
            }
        }
    }
}
