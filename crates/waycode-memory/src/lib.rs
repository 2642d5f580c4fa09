//! waycode-memory: retrieval-augmented memory for the refactor agent.
//!
//! Provides:
//! - SQLite-backed vector storage with three collections (code patterns,
//!   refactor history, style preferences)
//! - An embedding provider abstraction (Gemini over HTTP)
//! - JSON-persisted project memory and refactor history
//! - A rule table of textual pattern heuristics
//! - Context assembly for prompt injection

use std::path::PathBuf;

use thiserror::Error;

pub mod context;
pub mod embeddings;
pub mod manager;
pub mod patterns;
pub mod project;
pub mod store;

pub use context::build_context;
pub use embeddings::{auto_select_provider, EmbeddingProvider, GeminiEmbedding};
pub use manager::{MemoryManager, RelevantContext};
pub use project::{ProjectMemory, RefactorHistoryEntry};
pub use store::{Collection, SearchHit, VectorStore};

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Corrupt state file {path}: {source}")]
    CorruptState {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Embedding API error: {0}")]
    Embedding(String),
}

pub type Result<T> = std::result::Result<T, MemoryError>;
