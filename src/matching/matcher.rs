//! Weighted-ratio fuzzy matcher over the catalog.
//!
//! Scores a normalized query against each entry's precomputed key with a
//! composite of whole-string, token-sorted, and best-substring similarity
//! (normalized Levenshtein throughout). Token and partial scores carry the
//! classic weighted-ratio discounts; the partial family only participates
//! when the two strings diverge enough in length for substring matching to
//! mean something.

use serde::{Deserialize, Serialize};

use super::normalize;
use crate::types::{CatalogEntry, MatchResult};

/// Discount applied to token-sorted scores.
const TOKEN_DISCOUNT: f64 = 0.95;
/// Length ratio beyond which substring similarity joins the blend.
const LENGTH_DIVERGENCE: f64 = 1.5;
/// Partial-score scale for moderately diverging lengths.
const PARTIAL_SCALE: f64 = 0.9;
/// Partial-score scale once one string dwarfs the other.
const LONG_PARTIAL_SCALE: f64 = 0.6;
/// Length ratio at which the stronger partial discount kicks in.
const LONG_DIVERGENCE: f64 = 8.0;

/// Matcher tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Entries scoring at or below this are excluded entirely
    pub score_cutoff: u8,
    /// Default number of matches returned by the CLI
    pub limit: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            score_cutoff: 50,
            limit: 5,
        }
    }
}

/// Ranks catalog entries against a free-form query.
pub struct CatalogMatcher {
    config: MatcherConfig,
}

impl CatalogMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Score every entry and return at most `limit` matches, descending by
    /// confidence, ties preserving catalog order. Empty query or catalog
    /// yields an empty list; that is a valid outcome, not an error.
    pub fn search(
        &self,
        query: &str,
        catalog: &[CatalogEntry],
        limit: usize,
    ) -> Vec<MatchResult> {
        let key = normalize(query);
        if key.is_empty() || catalog.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<MatchResult> = catalog
            .iter()
            .map(|entry| MatchResult {
                confidence: weighted_ratio(&key, &entry.normalized_key),
                entry: entry.clone(),
            })
            .filter(|m| m.confidence > self.config.score_cutoff)
            .collect();

        // Stable sort: equal confidence keeps catalog order.
        results.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        results.truncate(limit);
        results
    }
}

/// Composite similarity in [0, 100].
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let base = ratio(a, b);
    let token_sort = token_sort_ratio(a, b) * TOKEN_DISCOUNT;

    let len_a = a.chars().count().max(1) as f64;
    let len_b = b.chars().count().max(1) as f64;
    let divergence = len_a.max(len_b) / len_a.min(len_b);

    let score = if divergence < LENGTH_DIVERGENCE {
        base.max(token_sort)
    } else {
        let scale = if divergence > LONG_DIVERGENCE {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        let partial = partial_ratio(a, b) * scale;
        let partial_token_sort =
            partial_ratio(&token_sorted(a), &token_sorted(b)) * TOKEN_DISCOUNT * scale;
        base.max(token_sort).max(partial).max(partial_token_sort)
    };

    score.round().clamp(0.0, 100.0) as u8
}

/// Whole-string similarity as a percentage.
fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn token_sorted(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Order-insensitive similarity: compare with tokens sorted.
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&token_sorted(a), &token_sorted(b))
}

/// Best alignment of the shorter string against any equal-length window of
/// the longer one.
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let short_len = short.chars().count();
    if short_len == 0 {
        return 0.0;
    }

    let long_chars: Vec<char> = long.chars().collect();
    if short_len >= long_chars.len() {
        return ratio(short, long);
    }

    let mut best = 0.0f64;
    for window in long_chars.windows(short_len) {
        let candidate: String = window.iter().collect();
        best = best.max(ratio(short, &candidate));
        if best >= 100.0 {
            break;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("Chanel", "No 5", "https://example.com/chanel-no-5"),
            CatalogEntry::new("Dior", "Sauvage", "https://example.com/dior-sauvage"),
            CatalogEntry::new("Creed", "Aventus", "https://example.com/creed-aventus"),
            CatalogEntry::new("Chanel", "Chance", "https://example.com/chanel-chance"),
        ]
    }

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(weighted_ratio("creed aventus", "creed aventus"), 100);
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(weighted_ratio("", "creed aventus"), 0);
        assert_eq!(weighted_ratio("creed aventus", ""), 0);
    }

    #[test]
    fn token_order_is_forgiven() {
        let swapped = weighted_ratio("aventus creed", "creed aventus");
        assert!(swapped >= 90, "got {}", swapped);
    }

    #[test]
    fn typo_query_finds_expected_entry_first() {
        let matcher = CatalogMatcher::new(MatcherConfig::default());
        let results = matcher.search("chanel no5", &catalog(), 5);
        assert!(!results.is_empty());
        assert_eq!(results[0].entry.name, "No 5");
        assert!(results[0].confidence > 50);
    }

    #[test]
    fn never_returns_scores_at_or_below_cutoff() {
        let matcher = CatalogMatcher::new(MatcherConfig::default());
        for query in ["chanel no5", "xyzzy plugh", "sauvge", "aventis"] {
            for result in matcher.search(query, &catalog(), 10) {
                assert!(result.confidence > 50, "{} scored {}", query, result.confidence);
            }
        }
    }

    #[test]
    fn respects_limit_and_descending_order() {
        let matcher = CatalogMatcher::new(MatcherConfig::default());
        let results = matcher.search("chanel", &catalog(), 1);
        assert!(results.len() <= 1);

        let all = matcher.search("chanel", &catalog(), 10);
        for pair in all.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn ties_preserve_catalog_order() {
        let twins = vec![
            CatalogEntry::new("Twin", "Scent", "https://example.com/a"),
            CatalogEntry::new("Twin", "Scent", "https://example.com/b"),
        ];
        let matcher = CatalogMatcher::new(MatcherConfig::default());
        let results = matcher.search("twin scent", &twins, 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].entry.source_url, "https://example.com/a");
        assert_eq!(results[1].entry.source_url, "https://example.com/b");
    }

    #[test]
    fn empty_query_and_empty_catalog_yield_nothing() {
        let matcher = CatalogMatcher::new(MatcherConfig::default());
        assert!(matcher.search("", &catalog(), 5).is_empty());
        assert!(matcher.search("!!!", &catalog(), 5).is_empty());
        assert!(matcher.search("chanel", &[], 5).is_empty());
    }

    #[test]
    fn short_query_against_long_key_uses_partial() {
        // "aventus" inside "creed aventus absolu millesime edition" style keys
        let entry = CatalogEntry::new(
            "Creed",
            "Aventus Absolu Millesime Limited Edition",
            "https://example.com/long",
        );
        let score = weighted_ratio("aventus", &entry.normalized_key);
        assert!(score > 50, "got {}", score);
    }
}
