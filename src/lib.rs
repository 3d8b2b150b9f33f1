//! # ChainAtlas
//!
//! Industry-chain graph builder for enterprise records.
//!
//! ChainAtlas ingests a spreadsheet of enterprise records, classifies each
//! record into a fixed five-level taxonomy (stream → plate → sub-category →
//! enterprise → town), computes defensive composite scores, optionally
//! enriches records through an LLM summarization call, and persists the
//! result as a property graph. The read side serializes the graph as a
//! `{nodes, links}` document for front-end visualization.
//!
//! ## Pipeline
//!
//! | Stage | Module | Responsibility |
//! |-------|--------|----------------|
//! | Parse | `ingest::spreadsheet`, `models::record` | Rows of named fields → typed records |
//! | Classify | `ingest` | Town resolution, scoring, taxonomy assignment |
//! | Enrich | `llm` | Product/service summarization (failure-tolerant) |
//! | Build | `services::ImportService` | Seed, group, rank, idempotent upsert |
//! | Serve | `services::ExportService` | Dedup, defaults, `{nodes, links}` document |
//!
//! ## Example
//!
//! ```rust,ignore
//! use chainatlas::services::{ExportService, ImportService};
//! use chainatlas::storage::SqliteGraphStore;
//!
//! let store = SqliteGraphStore::new("atlas.db")?;
//! let stats = ImportService::new(&store).run(csv_reader)?;
//! let document = ExportService::new(&store).build_document()?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::{AtlasConfig, SummarizerConfig};
pub use llm::{NoopSummarizer, Summarizer};
pub use ingest::Stream;
pub use models::{
    EdgeKind, EnterpriseFacts, EnterpriseRecord, GraphDocument, GraphEdge, GraphNode, NodeLevel,
    RawRow,
};
pub use services::{ExportService, ImportService, ImportStats};
pub use storage::{GraphStore, InMemoryGraphStore, SqliteGraphStore, StoreStats};

/// Error type for chainatlas operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing spreadsheet headers, malformed config files |
/// | `OperationFailed` | Store queries fail, I/O errors, summarization request errors |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - The spreadsheet has no header row
    /// - A configuration file cannot be parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` store operations fail
    /// - Filesystem I/O errors occur
    /// - The summarization endpoint returns an error or malformed response
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for chainatlas operations.
pub type Result<T> = std::result::Result<T, Error>;
