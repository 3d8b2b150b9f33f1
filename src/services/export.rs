//! Graph Reader: stored graph → served `{nodes, links}` document.
//!
//! The read is bounded and defensive: at most `row_limit` node rows are
//! fetched, duplicate ids are dropped first-wins, sibling counts for
//! level-4 nodes are computed in one pass over the fetched set, and edges
//! referencing a node outside the surviving set are filtered out so the
//! document never contains a dangling link.

use crate::models::document::{DetailView, DocumentLink, DocumentNode, GraphDocument};
use crate::models::node::NodeLevel;
use crate::storage::GraphStore;
use crate::Result;
use std::collections::{HashMap, HashSet};

/// Default node-row fetch bound.
pub const DEFAULT_ROW_LIMIT: usize = 10_000;

/// Service that serializes the stored graph for the front end.
pub struct ExportService<'a> {
    store: &'a dyn GraphStore,
    row_limit: usize,
}

impl<'a> ExportService<'a> {
    /// Creates an export service with the default row limit.
    #[must_use]
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self {
            store,
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }

    /// Overrides the node-row fetch bound.
    ///
    /// This is a hard scale boundary, not pagination: rows beyond it are
    /// silently dropped, and their edges fall away with them.
    #[must_use]
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// Builds the full `{nodes, links}` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn build_document(&self) -> Result<GraphDocument> {
        let fetched = self.store.fetch_nodes(self.row_limit)?;

        // one pass: level-4 sibling counts keyed by parent id
        let mut sibling_counts: HashMap<&str, i64> = HashMap::new();
        for node in &fetched {
            if node.level == NodeLevel::Enterprise {
                if let Some(parent) = node.parent.as_deref() {
                    *sibling_counts.entry(parent).or_insert(0) += 1;
                }
            }
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(fetched.len());
        let mut nodes: Vec<DocumentNode> = Vec::with_capacity(fetched.len());
        for node in &fetched {
            // first occurrence wins
            if !seen.insert(node.id.as_str()) {
                continue;
            }
            let total_siblings = match (node.level, node.parent.as_deref()) {
                (NodeLevel::Enterprise, Some(parent)) => {
                    sibling_counts.get(parent).copied().unwrap_or(1)
                }
                _ => 1,
            };
            nodes.push(DocumentNode {
                id: node.id.clone(),
                name: node.name.clone(),
                level: node.level.as_i64(),
                category: node.category.clone(),
                parent: node.parent.clone(),
                details: DetailView::from_facts(node.facts.as_ref(), total_siblings),
            });
        }

        let links = self
            .store
            .fetch_edges()?
            .into_iter()
            .filter(|e| seen.contains(e.source.as_str()) && seen.contains(e.target.as_str()))
            .map(|e| DocumentLink {
                source: e.source,
                target: e.target,
            })
            .collect();

        tracing::debug!(nodes = nodes.len(), "document built");
        Ok(GraphDocument { nodes, links })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::models::node::{EdgeKind, EnterpriseFacts, GraphEdge, GraphNode};
    use crate::storage::InMemoryGraphStore;

    fn enterprise(id: &str, parent: &str, rank: i64) -> GraphNode {
        GraphNode::new(id, NodeLevel::Enterprise, id)
            .with_parent(parent)
            .with_facts(EnterpriseFacts {
                code: format!("CODE{rank}"),
                rank,
                ..EnterpriseFacts::default()
            })
    }

    #[test]
    fn test_sibling_counts_per_parent() {
        let store = InMemoryGraphStore::new();
        store.upsert_node(&enterprise("甲", "组一", 1)).unwrap();
        store.upsert_node(&enterprise("乙", "组一", 2)).unwrap();
        store.upsert_node(&enterprise("丙", "组二", 1)).unwrap();

        let doc = ExportService::new(&store).build_document().unwrap();
        let siblings = |id: &str| {
            doc.nodes
                .iter()
                .find(|n| n.id == id)
                .unwrap()
                .details
                .total_siblings
        };
        assert_eq!(siblings("甲"), 2);
        assert_eq!(siblings("乙"), 2);
        assert_eq!(siblings("丙"), 1);
    }

    #[test]
    fn test_non_enterprise_nodes_serve_defaults() {
        let store = InMemoryGraphStore::new();
        store
            .upsert_node(&GraphNode::new("上游", NodeLevel::Stream, "上游"))
            .unwrap();

        let doc = ExportService::new(&store).build_document().unwrap();
        let details = &doc.nodes[0].details;
        assert_eq!(details.rank, 999);
        assert_eq!(details.total_siblings, 1);
        assert_eq!(details.intro, "暂无");
        assert_eq!(details.code, "-");
    }

    #[test]
    fn test_row_limit_drops_nodes_and_their_edges() {
        let store = InMemoryGraphStore::new();
        store
            .upsert_node(&GraphNode::new("a", NodeLevel::Stream, "a"))
            .unwrap();
        store
            .upsert_node(&GraphNode::new("b", NodeLevel::Plate, "b"))
            .unwrap();
        store
            .upsert_node(&GraphNode::new("c", NodeLevel::Plate, "c"))
            .unwrap();
        store
            .upsert_edge(&GraphEdge::new("a", "b", EdgeKind::Link))
            .unwrap();
        store
            .upsert_edge(&GraphEdge::new("a", "c", EdgeKind::Link))
            .unwrap();

        let doc = ExportService::new(&store)
            .with_row_limit(2)
            .build_document()
            .unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.links.len(), 1);
        assert_eq!(doc.links[0].target, "b");
    }

    #[test]
    fn test_no_dangling_links() {
        let store = InMemoryGraphStore::new();
        store
            .upsert_node(&GraphNode::new("a", NodeLevel::Stream, "a"))
            .unwrap();
        store
            .upsert_edge(&GraphEdge::new("a", "ghost", EdgeKind::Link))
            .unwrap();

        let doc = ExportService::new(&store).build_document().unwrap();
        assert!(doc.links.is_empty());
    }

    #[test]
    fn test_nan_scores_coerced_in_document() {
        let store = InMemoryGraphStore::new();
        store
            .upsert_node(&GraphNode::new("甲", NodeLevel::Enterprise, "甲").with_facts(
                EnterpriseFacts {
                    star_total: f64::NAN,
                    confidence: f64::NEG_INFINITY,
                    ..EnterpriseFacts::default()
                },
            ))
            .unwrap();

        let doc = ExportService::new(&store).build_document().unwrap();
        let details = &doc.nodes[0].details;
        assert_eq!(details.stars, 0.0);
        assert_eq!(details.confidence, 0.0);
    }
}
