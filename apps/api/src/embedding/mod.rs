//! Embedding client. Turns text into fixed-length vectors for the job index.
//!
//! `Embedder` wraps an [`EmbeddingProvider`] and applies the configured
//! [`FallbackPolicy`] when the provider fails. Fallback vectors are marked with
//! `fallback_used = true`; they are deterministic but carry no semantic meaning.

pub mod fallback;
pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub use fallback::hash_embedding;
pub use gemini::GeminiEmbedder;

/// Intent flag sent with each embedding request. Does not change vector shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingRole {
    /// Text that will be stored in the index.
    Document,
    /// Text used to search the index.
    Query,
}

impl EmbeddingRole {
    pub fn task_type(self) -> &'static str {
        match self {
            EmbeddingRole::Document => "RETRIEVAL_DOCUMENT",
            EmbeddingRole::Query => "RETRIEVAL_QUERY",
        }
    }
}

/// What to do when the embedding provider fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Substitute the deterministic hash pseudo-embedding.
    Hash,
    /// Return the provider error to the caller.
    Fail,
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed embedding response: expected {expected} values, got {actual}")]
    Malformed { expected: usize, actual: usize },

    #[error("embedding provider unavailable: {0}")]
    Provider(Box<EmbeddingError>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embedding {
    pub values: Vec<f32>,
    /// True when `values` came from the hash fallback instead of the provider.
    pub fallback_used: bool,
}

/// A remote (or fake) source of real embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(
        &self,
        text: &str,
        role: EmbeddingRole,
        dimension: usize,
    ) -> Result<Vec<f32>, EmbeddingError>;
}

/// Embedding entry point used by both pipelines.
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    policy: FallbackPolicy,
    dimension: usize,
}

impl Embedder {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        policy: FallbackPolicy,
        dimension: usize,
    ) -> Self {
        Self {
            provider,
            policy,
            dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Calls the provider only, never the fallback. Used by the connection test.
    pub async fn check_provider(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.provider
            .embed(text, EmbeddingRole::Query, self.dimension)
            .await
    }

    pub async fn embed(
        &self,
        text: &str,
        role: EmbeddingRole,
    ) -> Result<Embedding, EmbeddingError> {
        match self.provider.embed(text, role, self.dimension).await {
            Ok(values) if values.len() == self.dimension => Ok(Embedding {
                values,
                fallback_used: false,
            }),
            Ok(values) => {
                let error = EmbeddingError::Malformed {
                    expected: self.dimension,
                    actual: values.len(),
                };
                self.degrade(error, text)
            }
            Err(e) => self.degrade(e, text),
        }
    }

    fn degrade(&self, error: EmbeddingError, text: &str) -> Result<Embedding, EmbeddingError> {
        match self.policy {
            FallbackPolicy::Hash => {
                warn!("Embedding provider failed, using non-semantic hash fallback: {error}");
                Ok(Embedding {
                    values: hash_embedding(text, self.dimension),
                    fallback_used: true,
                })
            }
            FallbackPolicy::Fail => Err(EmbeddingError::Provider(Box::new(error))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingEmbeddings, FixedEmbeddings};

    #[tokio::test]
    async fn test_provider_vector_is_returned_unflagged() {
        let embedder = Embedder::new(Arc::new(FixedEmbeddings(0.25)), FallbackPolicy::Hash, 8);
        let embedding = embedder.embed("rust", EmbeddingRole::Document).await.unwrap();
        assert!(!embedding.fallback_used);
        assert_eq!(embedding.values, vec![0.25; 8]);
    }

    #[tokio::test]
    async fn test_provider_failure_uses_flagged_fallback() {
        let embedder = Embedder::new(Arc::new(FailingEmbeddings), FallbackPolicy::Hash, 1536);
        let embedding = embedder.embed("rust", EmbeddingRole::Query).await.unwrap();
        assert!(embedding.fallback_used);
        assert_eq!(embedding.values.len(), 1536);
        assert_eq!(embedding.values, hash_embedding("rust", 1536));
    }

    #[tokio::test]
    async fn test_fail_policy_propagates_provider_error() {
        let embedder = Embedder::new(Arc::new(FailingEmbeddings), FallbackPolicy::Fail, 1536);
        let err = embedder.embed("rust", EmbeddingRole::Query).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Provider(_)));
    }

    #[tokio::test]
    async fn test_wrong_length_response_is_treated_as_failure() {
        // FixedEmbeddings honors the requested dimension; ask the embedder for
        // a different one by wrapping a provider that ignores it.
        struct Short;
        #[async_trait]
        impl EmbeddingProvider for Short {
            async fn embed(
                &self,
                _: &str,
                _: EmbeddingRole,
                _: usize,
            ) -> Result<Vec<f32>, EmbeddingError> {
                Ok(vec![0.1; 768])
            }
        }

        let fail = Embedder::new(Arc::new(Short), FallbackPolicy::Fail, 1536);
        let err = fail.embed("x", EmbeddingRole::Document).await.unwrap_err();
        assert!(err.to_string().contains("expected 1536 values, got 768"));

        let hash = Embedder::new(Arc::new(Short), FallbackPolicy::Hash, 1536);
        let embedding = hash.embed("x", EmbeddingRole::Document).await.unwrap();
        assert!(embedding.fallback_used);
        assert_eq!(embedding.values.len(), 1536);
    }

    #[test]
    fn test_role_task_types() {
        assert_eq!(EmbeddingRole::Document.task_type(), "RETRIEVAL_DOCUMENT");
        assert_eq!(EmbeddingRole::Query.task_type(), "RETRIEVAL_QUERY");
    }
}
