mod config;
mod embedding;
mod errors;
mod jobs;
mod llm_client;
mod resume;
mod routes;
mod state;
mod vector_store;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, VectorBackend, EMBEDDING_DIMENSION};
use crate::embedding::{Embedder, GeminiEmbedder};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vector_store::{
    ensure_collection, CollectionSpec, MemoryStore, Metric, PineconeStore, ReadinessPolicy,
    VectorStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize embedding client
    let provider = GeminiEmbedder::new(config.google_api_key.clone())?;
    let embedder = Embedder::new(
        Arc::new(provider),
        config.embedding_fallback,
        EMBEDDING_DIMENSION,
    );
    info!(
        "Embedding client initialized (model: {}, fallback: {:?})",
        embedding::gemini::EMBEDDING_MODEL,
        config.embedding_fallback
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.google_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize vector store and make sure the job index exists
    let store: Arc<dyn VectorStore> = match config.vector_backend {
        VectorBackend::Pinecone => {
            let api_key = config
                .pinecone_api_key
                .clone()
                .context("PINECONE_API_KEY is required for the pinecone backend")?;
            Arc::new(PineconeStore::new(api_key, config.index_name.clone())?)
        }
        VectorBackend::Memory => Arc::new(MemoryStore::new()),
    };
    let spec = CollectionSpec {
        name: config.index_name.clone(),
        dimension: EMBEDDING_DIMENSION,
        metric: Metric::Cosine,
        cloud: config.pinecone_cloud.clone(),
        region: config.pinecone_region.clone(),
    };
    let policy = ReadinessPolicy {
        max_wait: config.index_ready_timeout,
        ..ReadinessPolicy::default()
    };
    let index = ensure_collection(store.as_ref(), &spec, policy).await?;
    info!(
        "Vector index '{}' ready ({:?}, dimension {}, backend {:?})",
        index.name, index.metric, index.dimension, config.vector_backend
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        embedder,
        store,
        llm: Arc::new(llm),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
