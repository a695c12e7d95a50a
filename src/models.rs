//! Core data types that flow through the indexing pipeline.
//!
//! A [`PageDocument`] is what the loader produces: one record per PDF page,
//! carrying source metadata. The normalizer narrows it to a [`Document`]
//! (content + source only), the chunker cuts documents into [`Chunk`]s, and
//! the uploader ships [`VectorRecord`]s.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Raw page-level record produced by the loader, before normalization.
#[derive(Debug, Clone)]
pub struct PageDocument {
    /// Extracted page text.
    pub content: String,
    /// Path of the originating file.
    pub source: String,
    /// 1-based page number within the file.
    pub page: u32,
    /// Total pages in the file.
    pub total_pages: u32,
    /// MIME type of the originating file.
    pub content_type: String,
    /// Filesystem modification time of the originating file.
    pub modified_at: DateTime<Utc>,
}

/// Minimal document shape retained after normalization.
///
/// All metadata other than `source` is deliberately dropped; downstream
/// stages depend on nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub content: String,
    pub source: String,
}

/// A bounded-length text window cut from a document.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Deterministic id, stable across runs for the same source and index.
    pub id: String,
    /// Window text, at most the configured chunk size except when a single
    /// unsplittable token forces a longer window.
    pub content: String,
    /// Inherited from the parent document.
    pub source: String,
    /// 0-based position of this chunk within its document.
    pub chunk_index: usize,
}

impl Chunk {
    /// Build a chunk with an id derived from `source` and `chunk_index`, so
    /// re-running the pipeline upserts the same ids instead of duplicating
    /// vectors.
    pub fn new(source: &str, chunk_index: usize, content: String) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update(b":");
        hasher.update(chunk_index.to_le_bytes());
        let id = format!("{:x}", hasher.finalize());

        Self {
            id,
            content,
            source: source.to_string(),
            chunk_index,
        }
    }
}

/// Metadata stored alongside each vector in the index.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordMetadata {
    /// The chunk text, kept so retrieval can return it without a side lookup.
    pub text: String,
    /// Originating file path.
    pub source: String,
}

/// The upsert unit: one embedded chunk.
#[derive(Debug, Clone, Serialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    pub fn from_chunk(chunk: &Chunk, values: Vec<f32>) -> Self {
        Self {
            id: chunk.id.clone(),
            values,
            metadata: RecordMetadata {
                text: chunk.content.clone(),
                source: chunk.source.clone(),
            },
        }
    }
}
