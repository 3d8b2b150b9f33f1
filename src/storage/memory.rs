//! In-memory graph store for testing.
//!
//! Provides a fast, non-persistent implementation of
//! [`GraphStore`](crate::storage::GraphStore) for unit tests and
//! development scenarios. Insertion order is preserved so reads mirror the
//! "query-result order" contract of the persistent store.

use crate::models::node::{GraphEdge, GraphNode};
use crate::storage::traits::{GraphStore, StoreStats};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory graph store for testing.
///
/// Uses `RwLock` for thread-safe access with reader-writer semantics.
/// Data is not persisted between runs.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    nodes: RwLock<Vec<GraphNode>>,
    edges: RwLock<Vec<GraphEdge>>,
}

impl InMemoryGraphStore {
    /// Creates a new empty in-memory graph store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes stored.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.read().map(|n| n.len()).unwrap_or(0)
    }

    /// Returns the number of edges stored.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.read().map(|e| e.len()).unwrap_or(0)
    }
}

impl GraphStore for InMemoryGraphStore {
    fn clear(&self) -> Result<()> {
        let mut nodes = self.nodes.write().map_err(|_| Error::OperationFailed {
            operation: "clear".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        let mut edges = self.edges.write().map_err(|_| Error::OperationFailed {
            operation: "clear".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        nodes.clear();
        edges.clear();
        Ok(())
    }

    fn upsert_node(&self, node: &GraphNode) -> Result<()> {
        let mut nodes = self.nodes.write().map_err(|_| Error::OperationFailed {
            operation: "upsert_node".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;

        // Overwrite in place to keep first-insert ordering
        if let Some(existing) = nodes.iter_mut().find(|n| n.id == node.id) {
            *existing = node.clone();
        } else {
            nodes.push(node.clone());
        }
        Ok(())
    }

    fn upsert_edge(&self, edge: &GraphEdge) -> Result<()> {
        let mut edges = self.edges.write().map_err(|_| Error::OperationFailed {
            operation: "upsert_edge".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;

        if !edges.contains(edge) {
            edges.push(edge.clone());
        }
        Ok(())
    }

    fn fetch_nodes(&self, limit: usize) -> Result<Vec<GraphNode>> {
        let nodes = self.nodes.read().map_err(|_| Error::OperationFailed {
            operation: "fetch_nodes".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        Ok(nodes.iter().take(limit).cloned().collect())
    }

    fn fetch_edges(&self) -> Result<Vec<GraphEdge>> {
        let edges = self.edges.read().map_err(|_| Error::OperationFailed {
            operation: "fetch_edges".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        Ok(edges.clone())
    }

    fn stats(&self) -> Result<StoreStats> {
        let nodes = self.nodes.read().map_err(|_| Error::OperationFailed {
            operation: "stats".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        let edges = self.edges.read().map_err(|_| Error::OperationFailed {
            operation: "stats".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;

        let mut nodes_by_level: HashMap<i64, usize> = HashMap::new();
        for node in nodes.iter() {
            *nodes_by_level.entry(node.level.as_i64()).or_insert(0) += 1;
        }

        Ok(StoreStats {
            node_count: nodes.len(),
            nodes_by_level,
            edge_count: edges.len(),
        })
    }
}
