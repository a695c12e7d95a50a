//! Pipeline error types.
//!
//! Every failure in the pipeline is fatal and maps to one of four kinds:
//! configuration, document loading, embedding, or upload. The CLI layer
//! wraps these in `anyhow` for display; library callers match on the kind.

/// Errors produced by the indexing pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Missing credentials or an unreadable/invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Directory or file access failure, or a PDF that could not be parsed.
    #[error("load error: {0}")]
    Load(String),

    /// Embedding provider call failed after retries, or returned vectors of
    /// the wrong dimensionality.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Index creation, readiness wait, or upsert failure.
    #[error("upload error: {0}")]
    Upload(String),
}

/// Result type alias using [`PipelineError`].
pub type Result<T> = std::result::Result<T, PipelineError>;
