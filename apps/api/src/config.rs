use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::embedding::FallbackPolicy;

pub const DEFAULT_INDEX_NAME: &str = "job-descriptions";
/// Dimension of every vector in the job index.
pub const EMBEDDING_DIMENSION: usize = 1536;
/// Request body cap for resume and batch uploads. PDF resumes with embedded
/// images often exceed axum's 2 MB default.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Which vector store implementation backs the job index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorBackend {
    Pinecone,
    /// In-process store. Contents are lost on restart.
    Memory,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only required for the Pinecone backend.
    pub pinecone_api_key: Option<String>,
    pub google_api_key: String,
    pub index_name: String,
    pub pinecone_cloud: String,
    pub pinecone_region: String,
    pub vector_backend: VectorBackend,
    pub embedding_fallback: FallbackPolicy,
    pub index_ready_timeout: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let vector_backend = parse_backend(&env_or("VECTOR_BACKEND", "pinecone"))?;
        let pinecone_api_key = pinecone_key_for(
            vector_backend,
            std::env::var("PINECONE_API_KEY").ok(),
        )?;

        Ok(Config {
            pinecone_api_key,
            google_api_key: require_env("GOOGLE_API_KEY")?,
            index_name: env_or("PINECONE_INDEX_NAME", DEFAULT_INDEX_NAME),
            pinecone_cloud: env_or("PINECONE_CLOUD", "aws"),
            pinecone_region: env_or("PINECONE_REGION", "us-east-1"),
            vector_backend,
            embedding_fallback: parse_fallback(&env_or("EMBEDDING_FALLBACK", "hash"))?,
            index_ready_timeout: Duration::from_secs(
                env_or("INDEX_READY_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("INDEX_READY_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a whole number of bytes")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

/// The Pinecone key is mandatory for the Pinecone backend and ignored otherwise.
fn pinecone_key_for(backend: VectorBackend, raw: Option<String>) -> Result<Option<String>> {
    let key = raw.filter(|v| !v.trim().is_empty());
    match (backend, key) {
        (VectorBackend::Pinecone, None) => {
            bail!("Required environment variable 'PINECONE_API_KEY' is not set")
        }
        (VectorBackend::Pinecone, key) => Ok(key),
        (VectorBackend::Memory, _) => Ok(None),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_backend(raw: &str) -> Result<VectorBackend> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pinecone" => Ok(VectorBackend::Pinecone),
        "memory" => Ok(VectorBackend::Memory),
        other => bail!("VECTOR_BACKEND must be 'pinecone' or 'memory', got '{other}'"),
    }
}

fn parse_fallback(raw: &str) -> Result<FallbackPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "hash" => Ok(FallbackPolicy::Hash),
        "fail" => Ok(FallbackPolicy::Fail),
        other => bail!("EMBEDDING_FALLBACK must be 'hash' or 'fail', got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_accepts_known_values() {
        assert_eq!(parse_backend("pinecone").unwrap(), VectorBackend::Pinecone);
        assert_eq!(parse_backend(" Memory ").unwrap(), VectorBackend::Memory);
    }

    #[test]
    fn test_parse_backend_rejects_unknown() {
        let err = parse_backend("qdrant").unwrap_err();
        assert!(err.to_string().contains("qdrant"));
    }

    #[test]
    fn test_pinecone_key_required_only_for_pinecone_backend() {
        assert!(pinecone_key_for(VectorBackend::Pinecone, None).is_err());
        assert!(pinecone_key_for(VectorBackend::Pinecone, Some("  ".into())).is_err());
        assert_eq!(
            pinecone_key_for(VectorBackend::Pinecone, Some("pc-key".into())).unwrap(),
            Some("pc-key".to_string())
        );
        assert_eq!(pinecone_key_for(VectorBackend::Memory, None).unwrap(), None);
    }

    #[test]
    fn test_parse_fallback_policy() {
        assert_eq!(parse_fallback("hash").unwrap(), FallbackPolicy::Hash);
        assert_eq!(parse_fallback("FAIL").unwrap(), FallbackPolicy::Fail);
        assert!(parse_fallback("maybe").is_err());
    }
}
