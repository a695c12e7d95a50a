//! # Vector Loader
//!
//! A batch pipeline that loads PDF document collections into a managed
//! vector index for retrieval-augmented chat.
//!
//! The pipeline is a single forward pass:
//!
//! ```text
//! ┌────────┐   ┌───────────┐   ┌─────────┐   ┌─────────┐   ┌──────────┐
//! │ Loader │──▶│ Normalize │──▶│ Chunker │──▶│ Embedder│──▶│ Uploader │
//! │ *.pdf  │   │ {content, │   │ 500/20  │   │ 384-dim │   │ managed  │
//! │ pages  │   │  source}  │   │ windows │   │ vectors │   │ index    │
//! └────────┘   └───────────┘   └─────────┘   └─────────┘   └──────────┘
//! ```
//!
//! No stage reads back from a later one; a failure anywhere aborts the run.
//! The embedding provider and the vector index are injected capabilities
//! ([`embedding::EmbeddingProvider`], [`index::VectorIndex`]) so tests can
//! substitute in-memory fakes.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment credentials |
//! | [`models`] | Core data types |
//! | [`loader`] | Directory scan and per-page PDF text extraction |
//! | [`normalize`] | Metadata narrowing to `{content, source}` |
//! | [`chunk`] | Overlapping-window text splitting |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`index`] | Vector index abstraction and REST client |
//! | [`pipeline`] | End-to-end orchestration |
//! | [`error`] | Pipeline error kinds |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod pipeline;
