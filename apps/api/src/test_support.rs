//! Deterministic doubles for the three service traits, shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{Config, VectorBackend, DEFAULT_MAX_UPLOAD_BYTES};
use crate::embedding::{Embedder, EmbeddingError, EmbeddingProvider, EmbeddingRole, FallbackPolicy};
use crate::jobs::models::JobPosting;
use crate::llm_client::{LlmError, NarrativeService};
use crate::state::AppState;
use crate::vector_store::{
    CollectionInfo, CollectionSpec, IndexStats, MemoryStore, Metric, ScoredRecord, VectorRecord,
    VectorStore, VectorStoreError,
};

pub const TEST_DIMENSION: usize = 64;

pub fn job(title: &str, company: &str) -> JobPosting {
    JobPosting {
        title: title.into(),
        company: company.into(),
        location: "Remote".into(),
        description: format!("{title} wanted at {company}."),
        ..Default::default()
    }
}

pub fn test_collection() -> CollectionSpec {
    CollectionSpec {
        name: "jobs".into(),
        dimension: TEST_DIMENSION,
        metric: Metric::Cosine,
        cloud: "aws".into(),
        region: "us-east-1".into(),
    }
}

/// In-memory store with a ready `jobs` collection of [`TEST_DIMENSION`].
pub fn memory_store() -> MemoryStore {
    MemoryStore::with_collection(test_collection())
}

/// Provider that is always down.
pub struct FailingEmbeddings;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddings {
    async fn embed(&self, _: &str, _: EmbeddingRole, _: usize) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Api {
            status: 503,
            message: "service unavailable".into(),
        })
    }
}

/// Provider returning the same value in every component.
pub struct FixedEmbeddings(pub f32);

#[async_trait]
impl EmbeddingProvider for FixedEmbeddings {
    async fn embed(
        &self,
        _: &str,
        _: EmbeddingRole,
        dimension: usize,
    ) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![self.0; dimension])
    }
}

/// Memory store whose every `n`th data call (upsert or query) fails.
pub struct FlakyStore {
    inner: MemoryStore,
    every: usize,
    calls: AtomicUsize,
    stored: AtomicUsize,
}

impl FlakyStore {
    pub fn failing_every(every: usize) -> Self {
        Self {
            inner: memory_store(),
            every,
            calls: AtomicUsize::new(0),
            stored: AtomicUsize::new(0),
        }
    }

    pub fn stored_count(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }

    fn trip(&self) -> Result<(), VectorStoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call % self.every == 0 {
            Err(VectorStoreError::Api {
                status: 500,
                message: format!("injected failure on call {call}"),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl VectorStore for FlakyStore {
    async fn describe_collection(
        &self,
        name: &str,
    ) -> Result<Option<CollectionInfo>, VectorStoreError> {
        self.inner.describe_collection(name).await
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), VectorStoreError> {
        self.inner.create_collection(spec).await
    }

    async fn upsert(&self, record: VectorRecord) -> Result<(), VectorStoreError> {
        self.trip()?;
        self.inner.upsert(record).await?;
        self.stored.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ScoredRecord>, VectorStoreError> {
        self.trip()?;
        self.inner.query(vector, top_k, include_metadata).await
    }

    async fn stats(&self) -> Result<IndexStats, VectorStoreError> {
        self.inner.stats().await
    }

    async fn delete_all(&self) -> Result<(), VectorStoreError> {
        self.inner.delete_all().await
    }
}

/// Replies with canned responses in order and records every prompt.
/// Runs out with `LlmError::EmptyContent`.
pub struct ScriptedNarrator {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedNarrator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeService for ScriptedNarrator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyContent)
    }
}

pub struct FailingNarrator;

#[async_trait]
impl NarrativeService for FailingNarrator {
    async fn generate(&self, _: &str) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 429,
            message: "quota exceeded".into(),
        })
    }
}

pub fn test_config() -> Config {
    Config {
        pinecone_api_key: None,
        google_api_key: "test-google-key".into(),
        index_name: "jobs".into(),
        pinecone_cloud: "aws".into(),
        pinecone_region: "us-east-1".into(),
        vector_backend: VectorBackend::Memory,
        embedding_fallback: FallbackPolicy::Hash,
        index_ready_timeout: Duration::from_secs(1),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        port: 0,
        rust_log: "debug".into(),
    }
}

/// App state over a memory store, the hash fallback and a scripted narrator.
pub fn test_state(llm: ScriptedNarrator) -> AppState {
    AppState {
        config: test_config(),
        embedder: Embedder::new(
            Arc::new(FailingEmbeddings),
            FallbackPolicy::Hash,
            TEST_DIMENSION,
        ),
        store: Arc::new(memory_store()),
        llm: Arc::new(llm),
    }
}
