//! Graph node and edge types for the five-level industry-chain hierarchy.
//!
//! # Levels
//!
//! | Level | Meaning | Id scheme |
//! |-------|---------|-----------|
//! | 1 | Stream (上游/中游/下游) | stream name |
//! | 2 | Plate | `stream-plate` |
//! | 3 | Sub-category | `stream-plate-subcat` |
//! | 4 | Enterprise | raw enterprise name |
//! | 5 | Town | town name |
//!
//! The composite-id scheme for levels 1-3 guarantees that distinct
//! (stream, plate, sub-category) triples never collide, which is what makes
//! upsert-by-id idempotent across full reimports.
//!
//! # Edges
//!
//! Two semantic kinds exist: the generic hierarchy [`EdgeKind::Link`]
//! (parent → child across levels 1-4) and the cross-cutting
//! [`EdgeKind::LocatedIn`] (enterprise → town), which is why the structure
//! is a forest only up to level 4.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag on enterprise (level 4) nodes.
pub const CATEGORY_ENTERPRISE: &str = "企业";
/// Category tag on town (level 5) nodes.
pub const CATEGORY_TOWN: &str = "街镇";

/// Hierarchy level of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeLevel {
    /// Level 1: industry-chain stream.
    Stream,
    /// Level 2: plate grouping within a stream.
    Plate,
    /// Level 3: leaf sub-category within a plate.
    SubCategory,
    /// Level 4: one enterprise record.
    Enterprise,
    /// Level 5: geographic subdistrict or town.
    Town,
}

impl NodeLevel {
    /// Returns the numeric level (1-5) used in the served document.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Stream => 1,
            Self::Plate => 2,
            Self::SubCategory => 3,
            Self::Enterprise => 4,
            Self::Town => 5,
        }
    }

    /// Parses a numeric level back into a `NodeLevel`.
    #[must_use]
    pub const fn from_i64(level: i64) -> Option<Self> {
        match level {
            1 => Some(Self::Stream),
            2 => Some(Self::Plate),
            3 => Some(Self::SubCategory),
            4 => Some(Self::Enterprise),
            5 => Some(Self::Town),
            _ => None,
        }
    }
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// Kind of a directed edge between two node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Generic hierarchy link (parent → child, levels 1-4).
    Link,
    /// Enterprise → town placement link.
    LocatedIn,
}

impl EdgeKind {
    /// Returns the edge kind as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::LocatedIn => "located_in",
        }
    }

    /// Parses an edge kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "link" => Some(Self::Link),
            "located_in" => Some(Self::LocatedIn),
            _ => None,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds the composite id of a level-2 plate node.
#[must_use]
pub fn plate_id(stream: &str, plate: &str) -> String {
    format!("{stream}-{plate}")
}

/// Builds the composite id of a level-3 sub-category node.
#[must_use]
pub fn subcategory_id(stream: &str, plate: &str, subcategory: &str) -> String {
    format!("{stream}-{plate}-{subcategory}")
}

/// A vertex in the industry-chain graph.
///
/// The id is the natural key for upsert; reprocessing the same input never
/// creates duplicates but does overwrite attributes with the latest values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique node id (natural upsert key).
    pub id: String,
    /// Hierarchy level.
    pub level: NodeLevel,
    /// Display name.
    pub name: String,
    /// Optional classification tag ("企业", "街镇").
    pub category: Option<String>,
    /// Id of the immediate level-(n-1) ancestor; absent for level 1.
    pub parent: Option<String>,
    /// Level-4-only attribute bag.
    pub facts: Option<EnterpriseFacts>,
}

impl GraphNode {
    /// Creates a new node without category, parent, or facts.
    #[must_use]
    pub fn new(id: impl Into<String>, level: NodeLevel, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            name: name.into(),
            category: None,
            parent: None,
            facts: None,
        }
    }

    /// Sets the category tag.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the parent node id.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Attaches the level-4 attribute bag.
    #[must_use]
    pub fn with_facts(mut self, facts: EnterpriseFacts) -> Self {
        self.facts = Some(facts);
        self
    }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Semantic kind of the edge.
    pub kind: EdgeKind,
}

impl GraphEdge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// Attribute bag persisted on level-4 enterprise nodes.
///
/// Fully overwritten (not merged) on every upsert from the current record's
/// sanitized fields and computed scores. Text fields hold sanitized values
/// and may be empty; the read side substitutes display defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseFacts {
    /// Display code within the sub-category group ("CODE1"…).
    pub code: String,
    /// Dense 1..N rank by descending composite score within the group.
    pub rank: i64,
    /// Composite star rating (0-5, one decimal).
    pub star_total: f64,
    /// Technology star rating.
    pub star_tech: f64,
    /// Capital-strength star rating.
    pub star_str: f64,
    /// Confidence star rating.
    pub star_rel: f64,
    /// Core technology / product / service text.
    pub tech_text: String,
    /// Summarized product and service list (HTML, may be empty).
    pub product_services: String,
    /// Main application scenario text.
    pub scene_text: String,
    /// Company introduction.
    pub intro: String,
    /// Legal representative.
    pub legal: String,
    /// Registered capital, raw text.
    pub capital: String,
    /// Founding date, raw text.
    pub date: String,
    /// Contact phone.
    pub contact: String,
    /// Business address.
    pub address: String,
    /// Comma-joined credential/honor tags (at most 8).
    pub tags: String,
    /// Insured head count, raw text.
    pub insured: String,
    /// Company type, raw text.
    pub company_type: String,
    /// Raw stream field (上游/中游/下游).
    pub industry_stream: String,
    /// Raw sub-category field.
    pub sub_category: String,
    /// Confidence score (0-100).
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_roundtrip() {
        for level in [
            NodeLevel::Stream,
            NodeLevel::Plate,
            NodeLevel::SubCategory,
            NodeLevel::Enterprise,
            NodeLevel::Town,
        ] {
            assert_eq!(NodeLevel::from_i64(level.as_i64()), Some(level));
        }
        assert_eq!(NodeLevel::from_i64(0), None);
        assert_eq!(NodeLevel::from_i64(6), None);
    }

    #[test]
    fn test_edge_kind_parse() {
        assert_eq!(EdgeKind::parse("link"), Some(EdgeKind::Link));
        assert_eq!(EdgeKind::parse("located_in"), Some(EdgeKind::LocatedIn));
        assert_eq!(EdgeKind::parse("sibling"), None);
    }

    #[test]
    fn test_composite_ids() {
        assert_eq!(plate_id("下游", "居家养老"), "下游-居家养老");
        assert_eq!(
            subcategory_id("下游", "居家养老", "上门护理"),
            "下游-居家养老-上门护理"
        );
    }

    #[test]
    fn test_node_builder() {
        let node = GraphNode::new("示例公司", NodeLevel::Enterprise, "示例公司")
            .with_category(CATEGORY_ENTERPRISE)
            .with_parent("下游-居家养老-上门护理")
            .with_facts(EnterpriseFacts {
                rank: 1,
                ..EnterpriseFacts::default()
            });

        assert_eq!(node.level, NodeLevel::Enterprise);
        assert_eq!(node.category.as_deref(), Some(CATEGORY_ENTERPRISE));
        assert_eq!(node.parent.as_deref(), Some("下游-居家养老-上门护理"));
        assert_eq!(node.facts.map(|f| f.rank), Some(1));
    }
}
