//! Metadata normalization.
//!
//! Narrows loader output to the minimal shape the rest of the pipeline
//! consumes: content plus `source`. Page numbers, timestamps, and content
//! types are dropped here on purpose — the index stores only what retrieval
//! needs to cite a document.

use crate::models::{Document, PageDocument};

/// Reduce each page record to `{content, source}`. Pure, 1:1,
/// order-preserving.
pub fn to_minimal_docs(pages: Vec<PageDocument>) -> Vec<Document> {
    pages
        .into_iter()
        .map(|page| Document {
            content: page.content,
            source: page.source,
        })
        .collect()
}
