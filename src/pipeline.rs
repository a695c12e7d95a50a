//! Indexing pipeline orchestration.
//!
//! Coordinates the full run: load → normalize → chunk → embed → upsert.
//! Stages execute strictly in order; embedding and upserting proceed in
//! batches, and the first failure of any kind aborts the run. Chunk ids are
//! deterministic, so re-running after a failure converges on the same index
//! contents instead of duplicating vectors.

use tracing::{debug, info};

use crate::chunk::TextSplitter;
use crate::config::Config;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::index::{ServerlessSpec, VectorIndex};
use crate::loader;
use crate::models::VectorRecord;
use crate::normalize;

/// Knobs for a single run.
#[derive(Debug, Default)]
pub struct IndexOptions {
    /// Scan and chunk, but skip embedding and upload.
    pub dry_run: bool,
    /// Cap on the number of input files.
    pub limit: Option<usize>,
}

/// Counts reported after a run.
#[derive(Debug, Default)]
pub struct IndexReport {
    pub pages: usize,
    pub documents: usize,
    pub chunks: usize,
    pub upserted: usize,
    pub index_created: bool,
}

/// Run the indexing pipeline against the injected provider and index.
pub async fn run_index(
    config: &Config,
    provider: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
    opts: &IndexOptions,
) -> Result<IndexReport> {
    let mut report = IndexReport::default();

    let pages = loader::load_pdf_dir(&config.data.dir, &config.data.include_globs, opts.limit)?;
    report.pages = pages.len();
    info!(pages = pages.len(), dir = %config.data.dir.display(), "loaded input");

    let docs = normalize::to_minimal_docs(pages);
    report.documents = docs.len();

    let splitter = TextSplitter::new(config.chunking.chunk_size, config.chunking.chunk_overlap);
    let chunks = splitter.split_documents(&docs);
    report.chunks = chunks.len();
    info!(chunks = chunks.len(), "chunked documents");

    if opts.dry_run {
        return Ok(report);
    }

    report.index_created = ensure_index(config, provider, index).await?;

    let index_name = config.index.name.as_str();
    for batch in chunks.chunks(config.embedding.batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        let vectors = provider.embed(&texts).await?;

        let records: Vec<VectorRecord> = batch
            .iter()
            .zip(vectors)
            .map(|(chunk, values)| VectorRecord::from_chunk(chunk, values))
            .collect();

        for upsert_batch in records.chunks(config.index.upsert_batch_size) {
            report.upserted += index.upsert(index_name, upsert_batch).await?;
        }
        debug!(upserted = report.upserted, total = chunks.len(), "progress");
    }

    Ok(report)
}

/// Create the index on first use. Returns whether a create was issued.
async fn ensure_index(
    config: &Config,
    provider: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
) -> Result<bool> {
    let name = config.index.name.as_str();
    if index.index_exists(name).await? {
        debug!(index = name, "index already exists");
        return Ok(false);
    }

    info!(index = name, dims = provider.dims(), "creating index");
    let spec = ServerlessSpec {
        cloud: config.index.cloud.clone(),
        region: config.index.region.clone(),
    };
    index
        .create_index(name, provider.dims(), &config.index.metric, &spec)
        .await?;
    Ok(true)
}
