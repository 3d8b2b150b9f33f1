//! Town resolver: free-text matching against a fixed gazetteer.
//!
//! Codes for gazetteer entries are positional ("01".."28"), so they stay
//! stable across runs only as long as the list ordering is unchanged.
//! Reordering or inserting entries silently shifts every later code;
//! append-only is the contract here.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Ordered gazetteer of recognized subdistrict/town names.
pub const GAZETTEER: [&str; 28] = [
    "上地街道",
    "万寿路街道",
    "西三旗街道",
    "中关村街道",
    "永定路街道",
    "学院路街道",
    "马连洼街道",
    "清河街道",
    "四季青镇",
    "北太平庄街道",
    "花园路街道",
    "东升镇",
    "八里庄街道",
    "田村路街道",
    "北下关街道",
    "紫竹院街道",
    "温泉镇",
    "上庄镇",
    "苏家坨镇",
    "西北旺镇",
    "羊坊店街道",
    "甘家口街道",
    "曙光街道",
    "香山街道",
    "燕园街道",
    "清华园街道",
    "海淀街道",
    "青龙桥街道",
];

/// Code for a town extracted by marker heuristic (named but unclassified).
pub const FALLBACK_CODE: &str = "98";
/// Display name of the unknown-town sentinel.
pub const UNKNOWN_NAME: &str = "未知";
/// Code of the unknown-town sentinel.
pub const UNKNOWN_CODE: &str = "00";

static TOWN_CODES: Lazy<HashMap<&'static str, String>> = Lazy::new(|| {
    GAZETTEER
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, format!("{:02}", i + 1)))
        .collect()
});

/// A resolved town: canonical display name and stable 2-digit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownMatch {
    /// Canonical town name (or a best-effort extraction, or the sentinel).
    pub name: String,
    /// Stable 2-digit code.
    pub code: String,
}

impl TownMatch {
    /// Returns true for the unknown-town sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.code == UNKNOWN_CODE
    }
}

/// Resolves a town from an address-like and a name-like field.
///
/// Exact substring match against the gazetteer in list order, first match
/// wins. On no match, marker heuristics extract a best-effort name: the
/// four characters ending at a "街道" marker, or the three characters
/// ending at a "镇" marker, both with the reserved [`FALLBACK_CODE`].
/// Otherwise the ("未知", "00") sentinel. Never fails.
#[must_use]
pub fn resolve_town(address: &str, company_name: &str) -> TownMatch {
    let text = format!("{address}{company_name}");

    for town in GAZETTEER {
        if text.contains(town) {
            let code = TOWN_CODES
                .get(town)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_CODE.to_string());
            return TownMatch {
                name: town.to_string(),
                code,
            };
        }
    }

    for marker in ["街道", "镇"] {
        if let Some(name) = marker_window(&text, marker) {
            return TownMatch {
                name,
                code: FALLBACK_CODE.to_string(),
            };
        }
    }

    TownMatch {
        name: UNKNOWN_NAME.to_string(),
        code: UNKNOWN_CODE.to_string(),
    }
}

/// Extracts the two characters preceding `marker` plus the marker itself.
///
/// Returns `None` when the marker is absent or has fewer than two
/// characters before it. Operates on characters, not bytes.
fn marker_window(text: &str, marker: &str) -> Option<String> {
    let pos = text.find(marker)?;
    let prefix = &text[..pos];
    let mut leading: Vec<char> = prefix.chars().rev().take(2).collect();
    if leading.len() < 2 {
        return None;
    }
    leading.reverse();
    let mut name: String = leading.into_iter().collect();
    name.push_str(marker);
    Some(name)
}
