//! Taxonomy classifier: stream → plate → sub-category assignment.
//!
//! The level-2 plate is a fixed decision table keyed by stream and, for
//! midstream/downstream, by keyword presence in the sub-category free text.
//! The level-3 name is the text after the first colon ("prefix:detail"
//! convention, full- or half-width). Deterministic, no external state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level industry-chain stream (the three fixed level-1 nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    /// 上游: technology suppliers.
    Upstream,
    /// 中游: smart products and services.
    Midstream,
    /// 下游: elderly-care delivery.
    Downstream,
}

impl Stream {
    /// Returns all streams in chain order (used for level-1 seeding).
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Upstream, Self::Midstream, Self::Downstream]
    }

    /// Returns the display name, which is also the level-1 node id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upstream => "上游",
            Self::Midstream => "中游",
            Self::Downstream => "下游",
        }
    }

    /// Parses a stream label; unknown labels yield `None` and the record
    /// is skipped by the importer.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "上游" => Some(Self::Upstream),
            "中游" => Some(Self::Midstream),
            "下游" => Some(Self::Downstream),
            _ => None,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification result: level-2 plate and level-3 sub-category names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    /// Level-2 plate name.
    pub plate: String,
    /// Level-3 sub-category name.
    pub sub_category: String,
}

impl Taxonomy {
    /// Classifies a record's sub-category free text under a stream.
    ///
    /// Full-width colons are normalized to half-width before prefix checks,
    /// so both "服务：上门护理" and "服务:上门护理" classify identically.
    #[must_use]
    pub fn classify(stream: Stream, raw_sub_category: &str) -> Self {
        let normalized = raw_sub_category.replace('：', ":");
        Self {
            plate: plate_for(stream, &normalized).to_string(),
            sub_category: sub_category_name(&normalized),
        }
    }
}

/// Level-2 plate decision table.
fn plate_for(stream: Stream, text: &str) -> &'static str {
    match stream {
        Stream::Upstream => "技术支撑层",
        Stream::Midstream => {
            if text.contains("服务:") {
                "智慧服务"
            } else if text.contains("产品:") || text.contains("产品") {
                "智慧产品"
            } else {
                "智慧服务"
            }
        }
        Stream::Downstream => {
            if text.contains("居家养老") {
                "居家养老"
            } else if text.contains("机构养老") {
                "机构养老"
            } else if text.contains("社区养老") {
                "社区养老"
            } else {
                "养老服务"
            }
        }
    }
}

/// Text after the first colon, or the whole trimmed text without one.
fn sub_category_name(text: &str) -> String {
    text.split(':')
        .nth(1)
        .unwrap_or(text)
        .trim()
        .to_string()
}
