//! Embedding provider abstraction and HTTP implementation.
//!
//! [`EmbeddingProvider`] is the seam the pipeline depends on; tests inject a
//! deterministic fake. [`HttpEmbedder`] calls an OpenAI-compatible
//! `/embeddings` endpoint with batching, retry, and backoff.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;
use crate::error::{PipelineError, Result};

/// Capability the pipeline uses to turn chunk text into vectors.
///
/// The provider is treated as a pure external function: the same text must
/// yield the same vector across calls.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Vector dimensionality (e.g. `384`).
    fn dims(&self) -> usize;

    /// Model identifier, for logs and summaries.
    fn model_name(&self) -> &str;
}

/// Provider backed by an OpenAI-compatible embeddings endpoint.
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dims: usize,
    max_retries: u32,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Embedding(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            dims: config.dims,
            max_retries: config.max_retries,
        })
    }

    async fn request_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                debug!(attempt, ?delay, "retrying embedding request");
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await.map_err(|e| {
                            PipelineError::Embedding(format!("invalid embeddings response: {e}"))
                        })?;
                        return parse_embeddings_response(&json);
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    if status.as_u16() == 429 || status.is_server_error() {
                        warn!(%status, "embedding provider error, will retry");
                        last_err = Some(PipelineError::Embedding(format!(
                            "provider returned {status}: {body_text}"
                        )));
                        continue;
                    }

                    // Client error (not 429): retrying won't help.
                    return Err(PipelineError::Embedding(format!(
                        "provider returned {status}: {body_text}"
                    )));
                }
                Err(e) => {
                    last_err = Some(PipelineError::Embedding(format!("request failed: {e}")));
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| PipelineError::Embedding("embedding failed after retries".into())))
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.request_batch(texts).await?;

        if vectors.len() != texts.len() {
            return Err(PipelineError::Embedding(format!(
                "provider returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        for vec in &vectors {
            if vec.len() != self.dims {
                return Err(PipelineError::Embedding(format!(
                    "provider returned {}-dimensional vector, expected {}",
                    vec.len(),
                    self.dims
                )));
            }
        }

        Ok(vectors)
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Parse an OpenAI-style embeddings response: `data[].embedding` arrays,
/// returned in input order.
fn parse_embeddings_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| PipelineError::Embedding("response missing data array".into()))?;

    let mut embeddings = Vec::with_capacity(data.len());

    for item in data {
        let embedding = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| PipelineError::Embedding("response item missing embedding".into()))?;

        let vec: Vec<f32> = embedding
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();

        embeddings.push(vec);
    }

    Ok(embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> EmbeddingConfig {
        EmbeddingConfig {
            base_url: base_url.to_string(),
            model: "test-model".to_string(),
            dims: 3,
            batch_size: 8,
            max_retries: 1,
            timeout_secs: 5,
        }
    }

    #[test]
    fn parses_embeddings_in_order() {
        let json = serde_json::json!({
            "data": [
                {"embedding": [1.0, 2.0], "index": 0},
                {"embedding": [3.0, 4.0], "index": 1},
            ]
        });
        let vectors = parse_embeddings_response(&json).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn missing_data_array_is_an_error() {
        let err = parse_embeddings_response(&serde_json::json!({})).unwrap_err();
        assert!(matches!(err, PipelineError::Embedding(_)));
    }

    #[tokio::test]
    async fn embeds_a_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(serde_json::json!({"model": "test-model"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"embedding": [0.1, 0.2, 0.3], "index": 0},
                    {"embedding": [0.4, 0.5, 0.6], "index": 1},
                ]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.uri()), "key".into()).unwrap();
        let texts = vec!["one".to_string(), "two".to_string()];
        let vectors = embedder.embed(&texts).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn wrong_dimensionality_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"embedding": [0.1, 0.2], "index": 0}]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.uri()), "key".into()).unwrap();
        let err = embedder.embed(&["one".to_string()]).await.unwrap_err();
        assert!(matches!(err, PipelineError::Embedding(_)));
    }

    #[tokio::test]
    async fn client_error_fails_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.uri()), "bad-key".into()).unwrap();
        let err = embedder.embed(&["one".to_string()]).await.unwrap_err();
        assert!(matches!(err, PipelineError::Embedding(_)));
    }

    #[tokio::test]
    async fn server_error_retries_then_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2) // initial attempt + one retry
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.uri()), "key".into()).unwrap();
        let err = embedder.embed(&["one".to_string()]).await.unwrap_err();
        assert!(matches!(err, PipelineError::Embedding(_)));
    }
}
