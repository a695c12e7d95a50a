//! # Vector Loader CLI (`vload`)
//!
//! Runs the PDF → chunks → embeddings → vector-index pipeline as a one-shot
//! batch job.
//!
//! ## Usage
//!
//! ```bash
//! vload --config ./config/vload.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vload index` | Load, chunk, embed, and upsert everything under `data.dir` |
//! | `vload index --dry-run` | Scan and chunk only; print counts |
//! | `vload check` | Validate config, credentials, and index reachability |
//!
//! Both API keys must be present in the environment (`OPENAI_API_KEY` for
//! the embedding provider, `PINECONE_API_KEY` for the vector database);
//! the run aborts before any document is read otherwise.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use vector_loader::config::{self, Credentials};
use vector_loader::embedding::{EmbeddingProvider, HttpEmbedder};
use vector_loader::index::{PineconeIndex, VectorIndex};
use vector_loader::pipeline::{run_index, IndexOptions};

/// Vector Loader — batch-load PDF collections into a managed vector index.
#[derive(Parser)]
#[command(
    name = "vload",
    about = "Batch-load PDF document collections into a managed vector index",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/vload.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the indexing pipeline: load PDFs, chunk, embed, upsert.
    ///
    /// Creates the target index on first use. The run either completes
    /// fully or aborts on the first error; chunk ids are deterministic, so
    /// re-running a failed job is safe.
    Index {
        /// Scan and chunk only — no embedding calls, no upload.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of PDF files to process.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Validate configuration, credentials, and index reachability.
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;
    let credentials = Credentials::from_env()?;

    match cli.command {
        Commands::Index { dry_run, limit } => {
            let provider = HttpEmbedder::new(&config.embedding, credentials.embedding_api_key)?;
            let index = PineconeIndex::new(&config.index, credentials.index_api_key)?;
            let opts = IndexOptions { dry_run, limit };

            let report = run_index(&config, &provider, &index, &opts).await?;

            if dry_run {
                println!("index {} (dry-run)", config.data.dir.display());
                println!("  pages: {}", report.pages);
                println!("  documents: {}", report.documents);
                println!("  estimated chunks: {}", report.chunks);
            } else {
                println!("index {}", config.data.dir.display());
                println!("  pages: {}", report.pages);
                println!("  documents: {}", report.documents);
                println!("  chunks: {}", report.chunks);
                println!("  vectors upserted: {}", report.upserted);
                println!(
                    "  index: {} ({})",
                    config.index.name,
                    if report.index_created {
                        "created"
                    } else {
                        "existing"
                    }
                );
            }
            println!("ok");
        }
        Commands::Check => {
            let provider = HttpEmbedder::new(&config.embedding, credentials.embedding_api_key)?;
            let index = PineconeIndex::new(&config.index, credentials.index_api_key)?;

            println!("check");
            println!("  config: ok ({})", cli.config.display());
            println!("  credentials: ok");
            println!(
                "  embedding: {} ({} dims)",
                provider.model_name(),
                provider.dims()
            );
            match index.index_exists(&config.index.name).await {
                Ok(true) => println!("  index {}: exists", config.index.name),
                Ok(false) => println!(
                    "  index {}: absent (created on first run)",
                    config.index.name
                ),
                Err(e) => {
                    println!("  index {}: unreachable ({e})", config.index.name);
                    anyhow::bail!("index check failed");
                }
            }
            println!("ok");
        }
    }

    Ok(())
}
