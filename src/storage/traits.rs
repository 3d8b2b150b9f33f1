//! Graph store trait.
//!
//! # Available Implementations
//!
//! | Backend | Use Case | Notes |
//! |---------|----------|-------|
//! | [`crate::storage::SqliteGraphStore`] | Default; embedded | WAL mode, `ON CONFLICT` upserts |
//! | [`crate::storage::InMemoryGraphStore`] | Testing | Fast, no persistence |
//!
//! # Guarantees
//!
//! - `upsert_node` is idempotent on the node id and fully overwrites
//!   attributes, so re-running an import never creates duplicates.
//! - `upsert_edge` is idempotent on the (source, target, kind) natural key.
//! - `fetch_nodes` order is query-result order, not guaranteed sorted;
//!   the bounded `limit` is a hard scale boundary, not pagination.
//! - The store offers no multi-statement transaction boundary; a failure
//!   mid-import can leave a partially-written graph (known risk, remedied
//!   by the destructive clear-and-rebuild import contract).

use crate::Result;
use crate::models::node::{GraphEdge, GraphNode};
use std::collections::HashMap;

/// Trait for property-graph store backends.
///
/// # Implementor Notes
///
/// - Methods use `&self` to enable sharing via `Arc<dyn GraphStore>`
/// - Use interior mutability (e.g., `Mutex<Connection>`) for mutable state
pub trait GraphStore: Send + Sync {
    /// Deletes every node and edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete operation fails.
    fn clear(&self) -> Result<()>;

    /// Inserts or fully overwrites a node by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn upsert_node(&self, node: &GraphNode) -> Result<()>;

    /// Inserts an edge if its (source, target, kind) key is new.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn upsert_edge(&self, edge: &GraphEdge) -> Result<()>;

    /// Reads up to `limit` nodes in query-result order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn fetch_nodes(&self, limit: usize) -> Result<Vec<GraphNode>>;

    /// Reads all edges as adjacency pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn fetch_edges(&self) -> Result<Vec<GraphEdge>>;

    /// Returns statistics about the stored graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    fn stats(&self) -> Result<StoreStats>;
}

/// Statistics about the stored graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of nodes.
    pub node_count: usize,
    /// Number of nodes by hierarchy level (1-5).
    pub nodes_by_level: HashMap<i64, usize>,
    /// Total number of edges.
    pub edge_count: usize,
}

impl StoreStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_stats_default() {
        let stats = StoreStats::default();
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.edge_count, 0);
        assert!(stats.nodes_by_level.is_empty());
    }
}
