//! Field sanitizer for raw spreadsheet cell values.

/// Placeholder tokens that mean "no data", matched case-insensitively.
const NULL_TOKENS: &[&str] = &["nan", "none", "null", "无", "-", "0"];

/// Normalizes a raw cell value into a clean string.
///
/// Trims surrounding whitespace and collapses null-like placeholder values
/// to the empty string, so absent input and literal "nan"/"无"/"-" cells are
/// treated identically downstream. Never fails.
#[must_use]
pub fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let lowered = trimmed.to_lowercase();
    if NULL_TOKENS.contains(&lowered.as_str()) {
        return String::new();
    }
    trimmed.to_string()
}
