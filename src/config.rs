use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Environment variable holding the embedding provider key.
pub const EMBEDDING_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the vector database key.
pub const INDEX_KEY_VAR: &str = "PINECONE_API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Directory scanned for input files.
    pub dir: PathBuf,
    /// Glob patterns matched against paths relative to `dir`.
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
}

fn default_include_globs() -> Vec<String> {
    vec!["*.pdf".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    500
}
fn default_chunk_overlap() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    /// OpenAI-compatible API base, without the trailing `/embeddings`.
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_dims")]
    pub dims: usize,
    /// Texts per API call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            dims: default_dims(),
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}
fn default_dims() -> usize {
    384
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_index_name")]
    pub name: String,
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default = "default_cloud")]
    pub cloud: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Control-plane API base.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Records per upsert call.
    #[serde(default = "default_upsert_batch_size")]
    pub upsert_batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: default_index_name(),
            metric: default_metric(),
            cloud: default_cloud(),
            region: default_region(),
            api_base: default_api_base(),
            upsert_batch_size: default_upsert_batch_size(),
        }
    }
}

fn default_index_name() -> String {
    "medical-chatbot".to_string()
}
fn default_metric() -> String {
    "cosine".to_string()
}
fn default_cloud() -> String {
    "aws".to_string()
}
fn default_region() -> String {
    "ap-southeast-2".to_string()
}
fn default_api_base() -> String {
    "https://api.pinecone.io".to_string()
}
fn default_upsert_batch_size() -> usize {
    100
}

/// API keys for the two external collaborators, read once at startup and
/// passed into the components that need them.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub embedding_api_key: String,
    pub index_api_key: String,
}

impl Credentials {
    /// Read credentials from the environment. Absence of either key is a
    /// fatal configuration error; the pipeline never starts without both.
    pub fn from_env() -> Result<Self> {
        let embedding_api_key = require_env(EMBEDDING_KEY_VAR)?;
        let index_api_key = require_env(INDEX_KEY_VAR)?;
        Ok(Self {
            embedding_api_key,
            index_api_key,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PipelineError::Config(format!(
            "{name} environment variable not set"
        ))),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!("failed to read config file {}: {e}", path.display()))
    })?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| PipelineError::Config(format!("failed to parse config file: {e}")))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.data.dir.as_os_str().is_empty() {
        return Err(PipelineError::Config("data.dir must not be empty".into()));
    }
    if config.data.include_globs.is_empty() {
        return Err(PipelineError::Config(
            "data.include_globs must not be empty".into(),
        ));
    }
    if config.chunking.chunk_size == 0 {
        return Err(PipelineError::Config(
            "chunking.chunk_size must be > 0".into(),
        ));
    }
    if config.chunking.chunk_overlap >= config.chunking.chunk_size {
        return Err(PipelineError::Config(
            "chunking.chunk_overlap must be smaller than chunking.chunk_size".into(),
        ));
    }
    if config.embedding.dims == 0 {
        return Err(PipelineError::Config("embedding.dims must be > 0".into()));
    }
    if config.embedding.batch_size == 0 {
        return Err(PipelineError::Config(
            "embedding.batch_size must be > 0".into(),
        ));
    }
    if config.index.name.is_empty() {
        return Err(PipelineError::Config("index.name must not be empty".into()));
    }
    if config.index.upsert_batch_size == 0 {
        return Err(PipelineError::Config(
            "index.upsert_batch_size must be > 0".into(),
        ));
    }
    match config.index.metric.as_str() {
        "cosine" | "euclidean" | "dotproduct" => {}
        other => {
            return Err(PipelineError::Config(format!(
                "unknown index.metric: '{other}'. Must be cosine, euclidean, or dotproduct."
            )))
        }
    }
    Ok(())
}
