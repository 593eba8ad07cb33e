use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::vector_store::{
    CollectionInfo, CollectionSpec, IndexStats, Metadata, Metric, ScoredRecord, VectorRecord,
    VectorStore, VectorStoreError,
};

pub const PINECONE_CONTROL_URL: &str = "https://api.pinecone.io";
const PINECONE_API_VERSION: &str = "2024-07";

#[derive(Debug, Deserialize)]
struct IndexModel {
    name: String,
    dimension: usize,
    metric: Metric,
    host: String,
    status: IndexStatus,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    ready: bool,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: [UpsertVector<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a Metadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    namespaces: BTreeMap<String, NamespaceSummary>,
    #[serde(default)]
    dimension: usize,
    #[serde(default)]
    index_fullness: f32,
    #[serde(default)]
    total_vector_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceSummary {
    #[serde(default)]
    vector_count: u64,
}

/// Pinecone REST client bound to one index.
///
/// Control-plane calls (describe/create) go to `control_url`; data-plane calls
/// go to the index host, resolved once via describe and cached.
pub struct PineconeStore {
    client: Client,
    api_key: String,
    index_name: String,
    control_url: String,
    host: OnceCell<String>,
}

impl PineconeStore {
    pub fn new(api_key: String, index_name: String) -> Result<Self, VectorStoreError> {
        Self::with_control_url(api_key, index_name, PINECONE_CONTROL_URL.to_string())
    }

    pub fn with_control_url(
        api_key: String,
        index_name: String,
        control_url: String,
    ) -> Result<Self, VectorStoreError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_key,
            index_name,
            control_url: control_url.trim_end_matches('/').to_string(),
            host: OnceCell::new(),
        })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
    }

    async fn fetch_index(&self, name: &str) -> Result<Option<IndexModel>, VectorStoreError> {
        let url = format!("{}/indexes/{}", self.control_url, name);
        let response = self.authed(self.client.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let model: IndexModel = check(response).await?.json().await?;
        Ok(Some(model))
    }

    async fn data_url(&self, path: &str) -> Result<String, VectorStoreError> {
        let host = self
            .host
            .get_or_try_init(|| async {
                let model = self
                    .fetch_index(&self.index_name)
                    .await?
                    .ok_or_else(|| VectorStoreError::NotFound(self.index_name.clone()))?;
                debug!("Resolved Pinecone host for {}: {}", model.name, model.host);
                Ok::<_, VectorStoreError>(with_scheme(&model.host))
            })
            .await?;
        Ok(format!("{host}{path}"))
    }
}

fn with_scheme(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

async fn check(response: Response) -> Result<Response, VectorStoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);
    Err(VectorStoreError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pinecone metadata may hold numbers, booleans, or string lists written by
/// other clients; flatten them to strings.
fn flatten_metadata(raw: serde_json::Map<String, Value>) -> Metadata {
    raw.into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, v)
        })
        .collect()
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn describe_collection(
        &self,
        name: &str,
    ) -> Result<Option<CollectionInfo>, VectorStoreError> {
        Ok(self.fetch_index(name).await?.map(|model| CollectionInfo {
            name: model.name,
            dimension: model.dimension,
            metric: model.metric,
            ready: model.status.ready,
            host: Some(model.host),
        }))
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), VectorStoreError> {
        let url = format!("{}/indexes", self.control_url);
        let body = json!({
            "name": spec.name,
            "dimension": spec.dimension,
            "metric": spec.metric,
            "spec": {"serverless": {"cloud": spec.cloud, "region": spec.region}},
        });
        let response = self.authed(self.client.post(url)).json(&body).send().await?;
        if response.status() == StatusCode::CONFLICT {
            info!("Index {} already exists", spec.name);
            return Ok(());
        }
        check(response).await?;
        info!("Created index {} ({}d, {:?})", spec.name, spec.dimension, spec.metric);
        Ok(())
    }

    async fn upsert(&self, record: VectorRecord) -> Result<(), VectorStoreError> {
        let url = self.data_url("/vectors/upsert").await?;
        let body = UpsertRequest {
            vectors: [UpsertVector {
                id: &record.id,
                values: &record.values,
                metadata: &record.metadata,
            }],
        };
        let response = self.authed(self.client.post(url)).json(&body).send().await?;
        check(response).await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ScoredRecord>, VectorStoreError> {
        let url = self.data_url("/query").await?;
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
        };
        let response = self.authed(self.client.post(url)).json(&body).send().await?;
        let parsed: QueryResponse = check(response).await?.json().await?;

        let mut matches: Vec<ScoredRecord> = parsed
            .matches
            .into_iter()
            .map(|m| ScoredRecord {
                id: m.id,
                score: m.score,
                metadata: m.metadata.map(flatten_metadata),
            })
            .collect();
        // Pinecone already sorts; keep the contract independent of that.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn stats(&self) -> Result<IndexStats, VectorStoreError> {
        let url = self.data_url("/describe_index_stats").await?;
        let response = self
            .authed(self.client.post(url))
            .json(&json!({}))
            .send()
            .await?;
        let parsed: StatsResponse = check(response).await?.json().await?;
        Ok(IndexStats {
            total_count: parsed.total_vector_count,
            dimension: parsed.dimension,
            fullness_ratio: parsed.index_fullness,
            namespaces: parsed
                .namespaces
                .into_iter()
                .map(|(name, summary)| (name, summary.vector_count))
                .collect(),
        })
    }

    async fn delete_all(&self) -> Result<(), VectorStoreError> {
        let url = self.data_url("/vectors/delete").await?;
        let response = self
            .authed(self.client.post(url))
            .json(&json!({"deleteAll": true}))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
