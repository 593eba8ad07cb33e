use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::vector_store::{CollectionInfo, CollectionSpec, VectorStore, VectorStoreError};

/// Bounded wait applied after creating a collection.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessPolicy {
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_secs(120),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Creates the collection if absent, then waits until the store reports it
/// ready. Calling it again on a ready collection makes no writes.
///
/// Fails with `NotReady` once `max_wait` elapses, and with
/// `DimensionMismatch` if an existing collection has a different dimension.
pub async fn ensure_collection(
    store: &dyn VectorStore,
    spec: &CollectionSpec,
    policy: ReadinessPolicy,
) -> Result<CollectionInfo, VectorStoreError> {
    let existing = store.describe_collection(&spec.name).await?;
    if let Some(info) = &existing {
        if info.dimension != spec.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: spec.dimension,
                actual: info.dimension,
            });
        }
        if info.ready {
            info!("Connected to index: {}", spec.name);
            return Ok(info.clone());
        }
    } else {
        info!("Creating index: {}", spec.name);
        store.create_collection(spec).await?;
    }

    info!(
        "Waiting up to {:?} for index {} to be ready...",
        policy.max_wait, spec.name
    );
    let started = Instant::now();
    loop {
        if let Some(info) = store.describe_collection(&spec.name).await? {
            if info.ready {
                info!("Index {} ready after {:?}", spec.name, started.elapsed());
                return Ok(info);
            }
        }
        let waited = started.elapsed();
        if waited >= policy.max_wait {
            warn!("Index {} still not ready after {:?}", spec.name, waited);
            return Err(VectorStoreError::NotReady {
                name: spec.name.clone(),
                waited,
            });
        }
        tokio::time::sleep(policy.poll_interval.min(policy.max_wait - waited)).await;
    }
}
