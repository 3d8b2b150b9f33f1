//! `SQLite` graph store.
//!
//! Persists the five-level industry-chain graph in two tables with
//! upsert-by-natural-key semantics.

// Allow cast_possible_truncation and cast_sign_loss for SQLite i64 to usize conversions.
// SQLite returns i64, but node counts are inherently non-negative and small.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Allow cast_possible_wrap - usize to i64 casts for SQLite limit parameters won't wrap.
#![allow(clippy::cast_possible_wrap)]

use crate::models::node::{EdgeKind, EnterpriseFacts, GraphEdge, GraphNode, NodeLevel};
use crate::storage::traits::{GraphStore, StoreStats};
use crate::{Error, Result};
use rusqlite::{Connection, Row, params};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Helper to acquire mutex lock with poison recovery.
fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("graph SQLite mutex was poisoned, recovering");
            metrics::counter!("graph_sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        }
    }
}

/// `SQLite`-based graph store.
///
/// # Concurrency Model
///
/// Uses a `Mutex<Connection>` for thread-safe access. WAL mode and
/// `busy_timeout` handle concurrent access gracefully. Each statement is
/// issued individually; there is no multi-statement transaction around an
/// import run.
///
/// # Schema
///
/// - `graph_nodes`: one row per node; level-4 attribute bag as JSON
/// - `graph_edges`: directed (source, target, kind) triples
pub struct SqliteGraphStore {
    /// Connection to the `SQLite` database.
    conn: Mutex<Connection>,
    /// Path to the database (None for in-memory).
    db_path: Option<PathBuf>,
}

impl SqliteGraphStore {
    /// Creates a new `SQLite` graph store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let conn = Connection::open(&db_path).map_err(|e| Error::OperationFailed {
            operation: "open_graph_sqlite".to_string(),
            cause: e.to_string(),
        })?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        };

        store.initialize()?;
        Ok(store)
    }

    /// Creates an in-memory `SQLite` graph store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::OperationFailed {
            operation: "open_graph_sqlite_memory".to_string(),
            cause: e.to_string(),
        })?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };

        store.initialize()?;
        Ok(store)
    }

    /// Returns the database path.
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Initializes the database schema.
    fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);

        // Enable WAL mode for better concurrent read performance
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");
        let _ = conn.pragma_update(None, "busy_timeout", "5000");

        conn.execute(
            "CREATE TABLE IF NOT EXISTS graph_nodes (
                id TEXT PRIMARY KEY,
                level INTEGER NOT NULL,
                name TEXT NOT NULL,
                category TEXT,
                parent TEXT,
                facts TEXT
            )",
            [],
        )
        .map_err(|e| Error::OperationFailed {
            operation: "create_graph_nodes_table".to_string(),
            cause: e.to_string(),
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS graph_edges (
                source TEXT NOT NULL,
                target TEXT NOT NULL,
                kind TEXT NOT NULL,
                PRIMARY KEY (source, target, kind)
            )",
            [],
        )
        .map_err(|e| Error::OperationFailed {
            operation: "create_graph_edges_table".to_string(),
            cause: e.to_string(),
        })?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_graph_nodes_parent ON graph_nodes(parent)",
            [],
        )
        .map_err(|e| Error::OperationFailed {
            operation: "create_graph_nodes_index".to_string(),
            cause: e.to_string(),
        })?;

        Ok(())
    }

    /// Maps a database row to a `GraphNode`.
    fn row_to_node(row: &Row<'_>) -> rusqlite::Result<GraphNode> {
        let level_num: i64 = row.get("level")?;
        let facts_json: Option<String> = row.get("facts")?;
        let facts = facts_json
            .as_deref()
            .and_then(|json| serde_json::from_str::<EnterpriseFacts>(json).ok());

        Ok(GraphNode {
            id: row.get("id")?,
            // unknown levels cannot occur through this store's writer
            level: NodeLevel::from_i64(level_num).unwrap_or(NodeLevel::Enterprise),
            name: row.get("name")?,
            category: row.get("category")?,
            parent: row.get("parent")?,
            facts,
        })
    }
}

impl GraphStore for SqliteGraphStore {
    fn clear(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        conn.execute("DELETE FROM graph_edges", [])
            .map_err(|e| Error::OperationFailed {
                operation: "clear_graph_edges".to_string(),
                cause: e.to_string(),
            })?;
        conn.execute("DELETE FROM graph_nodes", [])
            .map_err(|e| Error::OperationFailed {
                operation: "clear_graph_nodes".to_string(),
                cause: e.to_string(),
            })?;
        Ok(())
    }

    fn upsert_node(&self, node: &GraphNode) -> Result<()> {
        let facts_json = node
            .facts
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| Error::OperationFailed {
                operation: "serialize_node_facts".to_string(),
                cause: e.to_string(),
            })?;

        let conn = acquire_lock(&self.conn);
        conn.execute(
            "INSERT INTO graph_nodes (id, level, name, category, parent, facts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                level = excluded.level,
                name = excluded.name,
                category = excluded.category,
                parent = excluded.parent,
                facts = excluded.facts",
            params![
                node.id,
                node.level.as_i64(),
                node.name,
                node.category,
                node.parent,
                facts_json,
            ],
        )
        .map_err(|e| Error::OperationFailed {
            operation: "upsert_node".to_string(),
            cause: e.to_string(),
        })?;

        metrics::counter!("graph_node_upserts_total").increment(1);
        Ok(())
    }

    fn upsert_edge(&self, edge: &GraphEdge) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        conn.execute(
            "INSERT OR IGNORE INTO graph_edges (source, target, kind) VALUES (?1, ?2, ?3)",
            params![edge.source, edge.target, edge.kind.as_str()],
        )
        .map_err(|e| Error::OperationFailed {
            operation: "upsert_edge".to_string(),
            cause: e.to_string(),
        })?;

        metrics::counter!("graph_edge_upserts_total").increment(1);
        Ok(())
    }

    fn fetch_nodes(&self, limit: usize) -> Result<Vec<GraphNode>> {
        let conn = acquire_lock(&self.conn);
        let mut stmt = conn
            .prepare(
                "SELECT id, level, name, category, parent, facts
                 FROM graph_nodes ORDER BY rowid LIMIT ?1",
            )
            .map_err(|e| Error::OperationFailed {
                operation: "fetch_nodes".to_string(),
                cause: e.to_string(),
            })?;

        let nodes = stmt
            .query_map(params![limit as i64], Self::row_to_node)
            .map_err(|e| Error::OperationFailed {
                operation: "fetch_nodes".to_string(),
                cause: e.to_string(),
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::OperationFailed {
                operation: "fetch_nodes".to_string(),
                cause: e.to_string(),
            })?;

        Ok(nodes)
    }

    fn fetch_edges(&self) -> Result<Vec<GraphEdge>> {
        let conn = acquire_lock(&self.conn);
        let mut stmt = conn
            .prepare("SELECT source, target, kind FROM graph_edges")
            .map_err(|e| Error::OperationFailed {
                operation: "fetch_edges".to_string(),
                cause: e.to_string(),
            })?;

        let edges = stmt
            .query_map([], |row| {
                let kind: String = row.get("kind")?;
                Ok(GraphEdge {
                    source: row.get("source")?,
                    target: row.get("target")?,
                    kind: EdgeKind::parse(&kind).unwrap_or(EdgeKind::Link),
                })
            })
            .map_err(|e| Error::OperationFailed {
                operation: "fetch_edges".to_string(),
                cause: e.to_string(),
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::OperationFailed {
                operation: "fetch_edges".to_string(),
                cause: e.to_string(),
            })?;

        Ok(edges)
    }

    fn stats(&self) -> Result<StoreStats> {
        let conn = acquire_lock(&self.conn);

        let node_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM graph_nodes", [], |row| row.get(0))
            .map_err(|e| Error::OperationFailed {
                operation: "stats_node_count".to_string(),
                cause: e.to_string(),
            })?;

        let edge_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM graph_edges", [], |row| row.get(0))
            .map_err(|e| Error::OperationFailed {
                operation: "stats_edge_count".to_string(),
                cause: e.to_string(),
            })?;

        let mut stmt = conn
            .prepare("SELECT level, COUNT(*) FROM graph_nodes GROUP BY level")
            .map_err(|e| Error::OperationFailed {
                operation: "stats_by_level".to_string(),
                cause: e.to_string(),
            })?;

        let nodes_by_level = stmt
            .query_map([], |row| {
                let level: i64 = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((level, count as usize))
            })
            .map_err(|e| Error::OperationFailed {
                operation: "stats_by_level".to_string(),
                cause: e.to_string(),
            })?
            .collect::<rusqlite::Result<HashMap<_, _>>>()
            .map_err(|e| Error::OperationFailed {
                operation: "stats_by_level".to_string(),
                cause: e.to_string(),
            })?;

        Ok(StoreStats {
            node_count: node_count as usize,
            nodes_by_level,
            edge_count: edge_count as usize,
        })
    }
}
