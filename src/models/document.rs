//! Served document shape for the front end.
//!
//! The canonical output contract is `{ "nodes": [...], "links": [...] }`.
//! Every optional detail field has a literal default substituted when the
//! backing value is absent or empty, and every numeric field is guaranteed
//! finite; NaN and ±Inf are coerced to 0 before serialization.

use crate::models::node::EnterpriseFacts;
use serde::{Deserialize, Serialize};

/// Default rank for nodes without a computed rank.
pub const DEFAULT_RANK: i64 = 999;
/// Default placeholder for missing text details.
pub const DEFAULT_TEXT: &str = "-";
/// Placeholder for a missing company introduction.
pub const DEFAULT_INTRO: &str = "暂无";

/// Coerces a non-finite float to 0.
///
/// Hard contract for every numeric detail field, not just scores.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn text_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// The full graph document served to the front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Deduplicated nodes in query-result order.
    pub nodes: Vec<DocumentNode>,
    /// Edges whose both endpoints appear in `nodes`.
    pub links: Vec<DocumentLink>,
}

/// One node in the served document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Node id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Numeric hierarchy level (1-5).
    pub level: i64,
    /// Classification tag, if any.
    pub category: Option<String>,
    /// Parent node id, if any.
    pub parent: Option<String>,
    /// Detail payload with display defaults.
    pub details: DetailView,
}

/// One edge in the served document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
}

/// Per-node detail payload with documented display defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    /// Display code ("CODE1"…), default "-".
    pub code: String,
    /// Rank within the sub-category group, default 999.
    pub rank: i64,
    /// Count of level-4 nodes sharing the same parent, default 1.
    pub total_siblings: i64,
    /// Composite star rating.
    pub stars: f64,
    /// Technology star rating.
    pub star_tech: f64,
    /// Capital-strength star rating.
    pub star_str: f64,
    /// Confidence star rating.
    pub star_rel: f64,
    /// Company introduction, default "暂无".
    pub intro: String,
    /// Core technology text, default "-".
    pub tech: String,
    /// Application scenario text, default "-".
    pub scene: String,
    /// Legal representative, default "-".
    pub legal: String,
    /// Registered capital, default "-".
    pub capital: String,
    /// Founding date, default "-".
    pub date: String,
    /// Insured head count, default "-".
    pub insured: String,
    /// Company type, default "-".
    pub company_type: String,
    /// Raw stream field, default "-".
    pub industry_stream: String,
    /// Raw sub-category field, default "-".
    pub sub_category: String,
    /// Confidence score, default 0.
    pub confidence: f64,
    /// Contact phone, default "-".
    pub contact: String,
    /// Business address, default "-".
    pub address: String,
    /// Credential/honor tags, default "-".
    pub tags: String,
    /// Summarized product and service list, default "-".
    pub product_services: String,
    /// Core technology text (alias surfaced for the detail panel).
    pub tech_text: String,
    /// Application scenario text (alias surfaced for the detail panel).
    pub scene_text: String,
}

impl Default for DetailView {
    fn default() -> Self {
        Self {
            code: DEFAULT_TEXT.to_string(),
            rank: DEFAULT_RANK,
            total_siblings: 1,
            stars: 0.0,
            star_tech: 0.0,
            star_str: 0.0,
            star_rel: 0.0,
            intro: DEFAULT_INTRO.to_string(),
            tech: DEFAULT_TEXT.to_string(),
            scene: DEFAULT_TEXT.to_string(),
            legal: DEFAULT_TEXT.to_string(),
            capital: DEFAULT_TEXT.to_string(),
            date: DEFAULT_TEXT.to_string(),
            insured: DEFAULT_TEXT.to_string(),
            company_type: DEFAULT_TEXT.to_string(),
            industry_stream: DEFAULT_TEXT.to_string(),
            sub_category: DEFAULT_TEXT.to_string(),
            confidence: 0.0,
            contact: DEFAULT_TEXT.to_string(),
            address: DEFAULT_TEXT.to_string(),
            tags: DEFAULT_TEXT.to_string(),
            product_services: DEFAULT_TEXT.to_string(),
            tech_text: DEFAULT_TEXT.to_string(),
            scene_text: DEFAULT_TEXT.to_string(),
        }
    }
}

impl DetailView {
    /// Builds the detail payload for a node.
    ///
    /// `facts` is present only for level-4 enterprise nodes; all other
    /// levels serve the full default payload. `total_siblings` is the
    /// precomputed count of level-4 nodes under the same parent.
    #[must_use]
    pub fn from_facts(facts: Option<&EnterpriseFacts>, total_siblings: i64) -> Self {
        let Some(facts) = facts else {
            return Self::default();
        };
        Self {
            code: text_or(&facts.code, DEFAULT_TEXT),
            rank: facts.rank,
            total_siblings,
            stars: finite_or_zero(facts.star_total),
            star_tech: finite_or_zero(facts.star_tech),
            star_str: finite_or_zero(facts.star_str),
            star_rel: finite_or_zero(facts.star_rel),
            intro: text_or(&facts.intro, DEFAULT_INTRO),
            tech: text_or(&facts.tech_text, DEFAULT_TEXT),
            scene: text_or(&facts.scene_text, DEFAULT_TEXT),
            legal: text_or(&facts.legal, DEFAULT_TEXT),
            capital: text_or(&facts.capital, DEFAULT_TEXT),
            date: text_or(&facts.date, DEFAULT_TEXT),
            insured: text_or(&facts.insured, DEFAULT_TEXT),
            company_type: text_or(&facts.company_type, DEFAULT_TEXT),
            industry_stream: text_or(&facts.industry_stream, DEFAULT_TEXT),
            sub_category: text_or(&facts.sub_category, DEFAULT_TEXT),
            confidence: finite_or_zero(facts.confidence),
            contact: text_or(&facts.contact, DEFAULT_TEXT),
            address: text_or(&facts.address, DEFAULT_TEXT),
            tags: text_or(&facts.tags, DEFAULT_TEXT),
            product_services: text_or(&facts.product_services, DEFAULT_TEXT),
            tech_text: text_or(&facts.tech_text, DEFAULT_TEXT),
            scene_text: text_or(&facts.scene_text, DEFAULT_TEXT),
        }
    }
}
