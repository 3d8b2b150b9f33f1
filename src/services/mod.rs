//! Pipeline services.
//!
//! Services orchestrate the ingest stages and the graph store, providing
//! the two high-level operations: build the graph from a spreadsheet
//! (import) and serialize it for the front end (export).

mod export;
mod import;

pub use export::{DEFAULT_ROW_LIMIT, ExportService};
pub use import::{ImportService, ImportStats};
