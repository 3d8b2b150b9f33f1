//! Typed view of one spreadsheet row.
//!
//! The spreadsheet boundary yields [`RawRow`] mappings from the fixed
//! Chinese-language column names to raw cell values. [`EnterpriseRecord`]
//! validates and sanitizes a row once at ingestion, so downstream stages
//! never touch raw cells again.

use crate::ingest::sanitize::clean_field;
use std::collections::HashMap;

/// Spreadsheet column names.
pub mod fields {
    /// Enterprise name (required identity field).
    pub const NAME: &str = "企业名称";
    /// Eligibility flag for the smart elderly-care domain.
    pub const ELIGIBLE: &str = "是否属于智慧养老";
    /// Industry-chain stream (上游/中游/下游).
    pub const STREAM: &str = "上中下游";
    /// Sub-category free text ("prefix:detail" convention).
    pub const SUB_CATEGORY: &str = "细分小类";
    /// Business address.
    pub const BUSINESS_ADDRESS: &str = "经营地";
    /// Registered address (fallback for business address).
    pub const REGISTERED_ADDRESS: &str = "注册地";
    /// Registered capital in units of 10k, currency-like free text.
    pub const CAPITAL: &str = "注册资本(万)";
    /// Classification confidence (numeric or missing).
    pub const CONFIDENCE: &str = "置信度";
    /// Credentials, comma-delimited.
    pub const CREDENTIALS: &str = "单位资质";
    /// Honors, comma-delimited.
    pub const HONORS: &str = "单位荣誉";
    /// Core technology / product / service text.
    pub const TECH: &str = "核心技术/产品/服务";
    /// Main products and services.
    pub const MAIN_PRODUCTS: &str = "主营产品/服务";
    /// Company introduction.
    pub const INTRO: &str = "公司简介";
    /// Main application scenarios.
    pub const SCENE: &str = "主要应用场景";
    /// Legal representative.
    pub const LEGAL: &str = "法人";
    /// Founding date.
    pub const FOUNDED: &str = "成立日期";
    /// Contact phone.
    pub const CONTACT: &str = "联系电话";
    /// Insured head count.
    pub const INSURED: &str = "参保人数";
    /// Company type.
    pub const COMPANY_TYPE: &str = "企业类型";
}

/// One spreadsheet row as a mapping from column name to raw cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow(HashMap<String, String>);

impl RawRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    /// Returns the raw cell value for a column, or empty string if absent.
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map_or("", String::as_str)
    }

    /// Returns the sanitized cell value for a column.
    #[must_use]
    pub fn clean(&self, column: &str) -> String {
        clean_field(self.get(column))
    }
}

impl From<HashMap<String, String>> for RawRow {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

/// A validated, fully-sanitized enterprise record.
///
/// Built once per row; every text field has already passed the field
/// sanitizer, so empty string uniformly means "no data".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnterpriseRecord {
    /// Enterprise name (never empty).
    pub name: String,
    /// Raw stream label (上游/中游/下游), sanitized.
    pub stream: String,
    /// Raw sub-category text.
    pub sub_category: String,
    /// Business address, falling back to the registered address.
    pub address: String,
    /// Registered capital, raw text.
    pub capital: String,
    /// Confidence value, raw text.
    pub confidence: String,
    /// Credentials, comma-delimited.
    pub credentials: String,
    /// Honors, comma-delimited.
    pub honors: String,
    /// Core technology / product / service text.
    pub tech_text: String,
    /// Main products and services.
    pub main_products: String,
    /// Company introduction.
    pub intro: String,
    /// Main application scenarios.
    pub scene_text: String,
    /// Legal representative.
    pub legal: String,
    /// Founding date.
    pub founded: String,
    /// Contact phone.
    pub contact: String,
    /// Insured head count.
    pub insured: String,
    /// Company type.
    pub company_type: String,
}

impl EnterpriseRecord {
    /// Maximum number of tags kept per record.
    pub const MAX_TAGS: usize = 8;

    /// Builds a record from a raw row.
    ///
    /// Returns `None` when the row is outside the domain (eligibility cell
    /// does not contain `1`) or has no enterprise name. Such rows are
    /// skipped entirely; no partial node is ever created for them.
    #[must_use]
    pub fn from_row(row: &RawRow) -> Option<Self> {
        if !row.get(fields::ELIGIBLE).contains('1') {
            return None;
        }
        let name = row.clean(fields::NAME);
        if name.is_empty() {
            return None;
        }

        let business = row.clean(fields::BUSINESS_ADDRESS);
        let address = if business.is_empty() {
            row.clean(fields::REGISTERED_ADDRESS)
        } else {
            business
        };

        Some(Self {
            name,
            stream: row.clean(fields::STREAM),
            sub_category: row.clean(fields::SUB_CATEGORY),
            address,
            capital: row.clean(fields::CAPITAL),
            confidence: row.clean(fields::CONFIDENCE),
            credentials: row.clean(fields::CREDENTIALS),
            honors: row.clean(fields::HONORS),
            tech_text: row.clean(fields::TECH),
            main_products: row.clean(fields::MAIN_PRODUCTS),
            intro: row.clean(fields::INTRO),
            scene_text: row.clean(fields::SCENE),
            legal: row.clean(fields::LEGAL),
            founded: row.clean(fields::FOUNDED),
            contact: row.clean(fields::CONTACT),
            insured: row.clean(fields::INSURED),
            company_type: row.clean(fields::COMPANY_TYPE),
        })
    }

    /// Extracts display tags from the credential and honor fields.
    ///
    /// Splits on Chinese/ASCII comma, semicolon, and newline; keeps the
    /// first [`Self::MAX_TAGS`] distinct non-empty tokens in encounter
    /// order, comma-joined.
    #[must_use]
    pub fn tags(&self) -> String {
        let mut seen: Vec<&str> = Vec::new();
        for source in [&self.credentials, &self.honors] {
            for token in source.split(['，', ',', '；', ';', '\n']) {
                let token = token.trim();
                if token.is_empty() || seen.contains(&token) {
                    continue;
                }
                seen.push(token);
                if seen.len() == Self::MAX_TAGS {
                    return seen.join(",");
                }
            }
        }
        seen.join(",")
    }
}
