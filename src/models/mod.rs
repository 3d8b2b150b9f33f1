//! Data model types.
//!
//! The graph side (`node`, `document`) mirrors the five-level hierarchy
//! persisted to the store; the record side (`record`) is the strongly-typed
//! view of one spreadsheet row.

pub mod document;
pub mod node;
pub mod record;

pub use document::{DetailView, DocumentLink, DocumentNode, GraphDocument};
pub use node::{EdgeKind, EnterpriseFacts, GraphEdge, GraphNode, NodeLevel};
pub use record::{EnterpriseRecord, RawRow};
