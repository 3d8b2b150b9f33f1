//! Graph store backends.
//!
//! The pipeline depends on a minimal property-graph capability: node
//! upsert-by-id with full property overwrite, directed-edge upsert between
//! two node ids, full-graph delete, and bounded reads of node properties
//! and adjacency pairs.

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::InMemoryGraphStore;
pub use sqlite::SqliteGraphStore;
pub use traits::{GraphStore, StoreStats};
