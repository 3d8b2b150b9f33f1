//! Score engine: per-record numeric scores with defensive coercion.
//!
//! Every sub-computation independently resolves NaN, missing, or
//! unparsable input to 0; no non-finite value ever leaves this module.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound for tech and strength scores.
const SCORE_CAP: f64 = 100.0;

/// Digit-pattern scan for the first numeric token in currency-like text.
static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a compile-time constant
    Regex::new(r"\d+\.?\d*").unwrap()
});

/// Computed scores for one record.
///
/// `composite` is kept unrounded for ranking precision; the star ratings
/// are the display values (0-5 scale, one decimal).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreCard {
    /// Credential-derived technology score (0-100).
    pub tech: i64,
    /// Capital-derived strength score (0-100).
    pub strength: i64,
    /// Coerced confidence score (0-100).
    pub confidence: i64,
    /// Composite star rating.
    pub star_total: f64,
    /// Technology star rating.
    pub star_tech: f64,
    /// Strength star rating.
    pub star_strength: f64,
    /// Confidence star rating.
    pub star_confidence: f64,
    /// Unrounded weighted blend: 0.4·confidence + 0.3·strength + 0.3·tech.
    pub composite: f64,
}

impl ScoreCard {
    /// Computes all scores from sanitized raw fields.
    ///
    /// * `credentials`: comma-delimited credential text ("" = none)
    /// * `capital`: currency-like free text, first numeric token wins
    /// * `confidence`: numeric-ish text, coerced with default 0
    #[must_use]
    pub fn compute(credentials: &str, capital: &str, confidence: &str) -> Self {
        #[allow(clippy::cast_precision_loss)] // token counts are tiny
        let tech = SCORE_CAP.min(credential_count(credentials) as f64 * 10.0);
        let strength = finite(SCORE_CAP.min((capital_value(capital) + 1.0).ln() * 10.0));
        let conf = safe_int(confidence);

        #[allow(clippy::cast_precision_loss)] // confidence is bounded in practice
        let conf_f = conf as f64;
        let composite = finite(conf_f * 0.4 + strength * 0.3 + tech * 0.3);

        #[allow(clippy::cast_possible_truncation)] // bounded by SCORE_CAP
        let (tech_int, strength_int) = (tech as i64, strength as i64);

        Self {
            tech: tech_int,
            strength: strength_int,
            confidence: conf,
            star_total: to_star(composite),
            star_tech: to_star(tech),
            star_strength: to_star(strength),
            star_confidence: to_star(conf_f),
            composite,
        }
    }
}

/// Number of comma-separated credential tokens; empty input counts zero.
fn credential_count(credentials: &str) -> usize {
    if credentials.is_empty() {
        0
    } else {
        credentials.split(',').count()
    }
}

/// First numeric token extracted from currency-like free text, default 0.
fn capital_value(capital: &str) -> f64 {
    NUMERIC_TOKEN
        .find(capital)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map_or(0.0, finite)
}

/// Coerces a numeric-ish string to an integer, default 0.
///
/// Handles missing values, float-as-string ("50.0"), and NaN.
fn safe_int(value: &str) -> i64 {
    match value.trim().parse::<f64>() {
        #[allow(clippy::cast_possible_truncation)] // finite checked above
        Ok(f) if f.is_finite() => f as i64,
        _ => 0,
    }
}

/// Replaces a non-finite value with 0.
fn finite(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Maps a 0-100 value onto a 0-5 star scale, one decimal place.
fn to_star(value: f64) -> f64 {
    finite((value / 20.0 * 10.0).round() / 10.0)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_tech_score_caps_at_100() {
        // 12 tokens would be 120 uncapped
        let credentials = (0..12).map(|i| format!("资质{i}")).collect::<Vec<_>>();
        let card = ScoreCard::compute(&credentials.join(","), "", "");
        assert_eq!(card.tech, 100);
        assert_eq!(card.star_tech, 5.0);
    }

    #[test]
    fn test_empty_credentials_score_zero() {
        let card = ScoreCard::compute("", "", "");
        assert_eq!(card.tech, 0);
        assert_eq!(card.strength, 0);
        assert_eq!(card.confidence, 0);
        assert_eq!(card.composite, 0.0);
    }

    #[test]
    fn test_strength_from_capital_text() {
        // ln(500 + 1) * 10 ≈ 62.17
        let card = ScoreCard::compute("", "500万", "");
        assert_eq!(card.strength, 62);
        // huge capital still capped
        let card = ScoreCard::compute("", "999999999999元", "");
        assert_eq!(card.strength, 100);
    }

    #[test_case("50", 50; "integer")]
    #[test_case("50.0", 50; "float as string")]
    #[test_case("87.9", 87; "truncates")]
    #[test_case("", 0; "missing")]
    #[test_case("NaN", 0; "nan literal")]
    #[test_case("abc", 0; "unparsable")]
    fn test_confidence_coercion(input: &str, expected: i64) {
        let card = ScoreCard::compute("", "", input);
        assert_eq!(card.confidence, expected);
    }

    #[test]
    fn test_composite_weighting() {
        // tech = 20 (2 tokens), strength = 0, confidence = 50
        let card = ScoreCard::compute("a,b", "", "50");
        assert_eq!(card.composite, 50.0 * 0.4 + 20.0 * 0.3);
        assert_eq!(card.star_total, 1.3);
    }

    #[test]
    fn test_composite_unrounded_for_ranking() {
        let card = ScoreCard::compute("a", "3", "33");
        // star is rounded to one decimal, composite is not
        assert_eq!(card.star_total, (card.composite / 20.0 * 10.0).round() / 10.0);
        assert!(card.composite.is_finite());
    }

    #[test]
    fn test_all_outputs_finite_on_garbage() {
        let card = ScoreCard::compute("，，，", "inf", "Infinity");
        for v in [
            card.star_total,
            card.star_tech,
            card.star_strength,
            card.star_confidence,
            card.composite,
        ] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_capital_first_token_wins() {
        let card = ScoreCard::compute("", "约500万至1000万", "");
        // first numeric token is 500
        assert_eq!(card.strength, ((500.0f64 + 1.0).ln() * 10.0) as i64);
    }
}
