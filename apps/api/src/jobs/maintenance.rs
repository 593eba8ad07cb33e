//! Index maintenance: delete-all and the connection test.

use serde::Serialize;
use tracing::{info, warn};

use crate::embedding::Embedder;
use crate::vector_store::{VectorStore, VectorStoreError};

#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub deleted: u64,
}

/// Deletes every job in the index. Skips the delete call when the index is
/// already empty.
pub async fn delete_all_jobs(store: &dyn VectorStore) -> Result<DeleteOutcome, VectorStoreError> {
    let stats = store.stats().await?;
    if stats.total_count == 0 {
        info!("No jobs to delete");
        return Ok(DeleteOutcome { deleted: 0 });
    }

    store.delete_all().await?;
    warn!("All jobs deleted from index ({} vectors)", stats.total_count);
    Ok(DeleteOutcome {
        deleted: stats.total_count,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReport {
    /// The vector store answered a describe call.
    pub vector_store: bool,
    /// The embedding provider returned a real (non-fallback) vector.
    pub embedding: bool,
    /// The job index exists and is ready.
    pub index: bool,
    pub errors: Vec<String>,
}

impl ConnectionReport {
    pub fn all_ok(&self) -> bool {
        self.vector_store && self.embedding && self.index
    }
}

/// Checks each external service once. Never fails; problems are reported.
pub async fn test_connection(
    index_name: &str,
    embedder: &Embedder,
    store: &dyn VectorStore,
) -> ConnectionReport {
    let mut errors = Vec::new();

    let (vector_store, index) = match store.describe_collection(index_name).await {
        Ok(Some(info)) => {
            if !info.ready {
                errors.push(format!("index '{index_name}' is not ready"));
            }
            (true, info.ready)
        }
        Ok(None) => {
            errors.push(format!("index '{index_name}' does not exist"));
            (true, false)
        }
        Err(e) => {
            errors.push(format!("vector store: {e}"));
            (false, false)
        }
    };

    let embedding = match embedder.check_provider("connection test").await {
        Ok(values) if values.len() == embedder.dimension() => true,
        Ok(values) => {
            errors.push(format!(
                "embedding: expected {} values, got {}",
                embedder.dimension(),
                values.len()
            ));
            false
        }
        Err(e) => {
            errors.push(format!("embedding: {e}"));
            false
        }
    };

    ConnectionReport {
        vector_store,
        embedding,
        index,
        errors,
    }
}
