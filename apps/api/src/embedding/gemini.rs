use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::{EmbeddingError, EmbeddingProvider, EmbeddingRole};
use crate::llm_client::{google_error_message, GOOGLE_API_BASE};

/// Embedding model. Supports `outputDimensionality` up to 3072.
pub const EMBEDDING_MODEL: &str = "gemini-embedding-001";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: String,
    content: EmbedContent<'a>,
    task_type: &'static str,
    output_dimensionality: usize,
}

#[derive(Debug, Serialize)]
struct EmbedContent<'a> {
    parts: Vec<EmbedPart<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbedValues,
}

#[derive(Debug, Deserialize)]
struct EmbedValues {
    values: Vec<f32>,
}

/// Google Generative Language `embedContent` client.
#[derive(Clone)]
pub struct GeminiEmbedder {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiEmbedder {
    pub fn new(api_key: String) -> Result<Self, EmbeddingError> {
        Self::with_base_url(api_key, GOOGLE_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(
        &self,
        text: &str,
        role: EmbeddingRole,
        dimension: usize,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbedRequest {
            model: format!("models/{EMBEDDING_MODEL}"),
            content: EmbedContent {
                parts: vec![EmbedPart { text }],
            },
            task_type: role.task_type(),
            output_dimensionality: dimension,
        };

        let url = format!(
            "{}/v1beta/models/{}:embedContent",
            self.base_url, EMBEDDING_MODEL
        );
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: google_error_message(body),
            });
        }

        let parsed: EmbedResponse = response.json().await?;
        let values = parsed.embedding.values;
        if values.len() != dimension {
            return Err(EmbeddingError::Malformed {
                expected: dimension,
                actual: values.len(),
            });
        }
        debug!("Embedded {} chars as {:?}", text.len(), role);
        Ok(values)
    }
}
