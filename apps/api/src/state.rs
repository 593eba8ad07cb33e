use std::sync::Arc;

use crate::config::Config;
use crate::embedding::Embedder;
use crate::llm_client::NarrativeService;
use crate::vector_store::VectorStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub embedder: Embedder,
    /// Pinecone in production, `MemoryStore` when `VECTOR_BACKEND=memory`.
    pub store: Arc<dyn VectorStore>,
    /// Skill extraction and career analysis calls.
    pub llm: Arc<dyn NarrativeService>,
}
