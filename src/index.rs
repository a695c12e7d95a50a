//! Vector index abstraction and Pinecone serverless implementation.
//!
//! The pipeline depends only on the minimal [`VectorIndex`] contract —
//! existence check, creation, upsert — so tests can substitute an in-memory
//! fake. [`PineconeIndex`] talks to the managed service over REST: the
//! control plane describes and creates indexes, the per-index data plane
//! host (returned by describe) receives upserts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::IndexConfig;
use crate::error::{PipelineError, Result};
use crate::models::VectorRecord;

/// Serverless placement for a newly created index.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServerlessSpec {
    pub cloud: String,
    pub region: String,
}

/// Minimal contract against the managed vector database.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Whether the named index already exists.
    async fn index_exists(&self, name: &str) -> Result<bool>;

    /// Create the named index and wait until it is ready to accept writes.
    async fn create_index(
        &self,
        name: &str,
        dimension: usize,
        metric: &str,
        spec: &ServerlessSpec,
    ) -> Result<()>;

    /// Upsert a batch of records, returning the count the service reports.
    async fn upsert(&self, name: &str, records: &[VectorRecord]) -> Result<usize>;
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: SpecBody<'a>,
}

#[derive(Debug, Serialize)]
struct SpecBody<'a> {
    serverless: &'a ServerlessSpec,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    #[serde(default)]
    host: String,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Debug, Deserialize, Default)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(Debug, Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: usize,
}

/// Pinecone-style REST client.
pub struct PineconeIndex {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    /// Data-plane host cached from the first describe call.
    host: Mutex<Option<String>>,
}

/// Poll interval and cap while waiting for a new index to become ready.
const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);
const READY_POLL_ATTEMPTS: u32 = 60;

impl PineconeIndex {
    pub fn new(config: &IndexConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PipelineError::Upload(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            host: Mutex::new(None),
        })
    }

    /// Describe the index on the control plane. `Ok(None)` means the index
    /// does not exist.
    async fn describe(&self, name: &str) -> Result<Option<DescribeIndexResponse>> {
        let url = format!("{}/indexes/{}", self.api_base, name);
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| PipelineError::Upload(format!("describe index failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            let described: DescribeIndexResponse = response
                .json()
                .await
                .map_err(|e| PipelineError::Upload(format!("invalid describe response: {e}")))?;
            Ok(Some(described))
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PipelineError::Upload(format!(
                "describe index returned {status}: {body}"
            )))
        }
    }

    /// Resolve the data-plane host, describing the index if not yet cached.
    async fn data_host(&self, name: &str) -> Result<String> {
        if let Some(host) = self.host.lock().await.clone() {
            return Ok(host);
        }

        let described = self.describe(name).await?.ok_or_else(|| {
            PipelineError::Upload(format!("index '{name}' does not exist"))
        })?;
        if described.host.is_empty() {
            return Err(PipelineError::Upload(format!(
                "index '{name}' has no data-plane host yet"
            )));
        }

        let host = described.host;
        *self.host.lock().await = Some(host.clone());
        Ok(host)
    }

    async fn wait_until_ready(&self, name: &str) -> Result<()> {
        for attempt in 0..READY_POLL_ATTEMPTS {
            if let Some(described) = self.describe(name).await? {
                if described.status.ready && !described.host.is_empty() {
                    *self.host.lock().await = Some(described.host);
                    return Ok(());
                }
            }
            debug!(attempt, index = name, "index not ready yet");
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }

        Err(PipelineError::Upload(format!(
            "index '{name}' did not become ready in time"
        )))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn index_exists(&self, name: &str) -> Result<bool> {
        match self.describe(name).await? {
            Some(described) => {
                if !described.host.is_empty() {
                    *self.host.lock().await = Some(described.host);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_index(
        &self,
        name: &str,
        dimension: usize,
        metric: &str,
        spec: &ServerlessSpec,
    ) -> Result<()> {
        let url = format!("{}/indexes", self.api_base);
        let body = CreateIndexRequest {
            name,
            dimension,
            metric,
            spec: SpecBody { serverless: spec },
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Upload(format!("create index failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::CONFLICT {
            // Already created by a previous run; readiness check still applies.
            debug!(index = name, "index already exists");
        } else if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upload(format!(
                "create index returned {status}: {body_text}"
            )));
        }

        self.wait_until_ready(name).await
    }

    async fn upsert(&self, name: &str, records: &[VectorRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let host = self.data_host(name).await?;
        // Describe returns a bare hostname; keep an explicit scheme usable
        // for local endpoints.
        let url = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}/vectors/upsert", host.trim_end_matches('/'))
        } else {
            format!("https://{host}/vectors/upsert")
        };

        let body = UpsertRequest { vectors: records };
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Upload(format!("upsert failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upload(format!(
                "upsert returned {status}: {body_text}"
            )));
        }

        let parsed: UpsertResponse = response
            .json()
            .await
            .unwrap_or(UpsertResponse { upserted_count: records.len() });
        Ok(parsed.upserted_count)
    }
}
