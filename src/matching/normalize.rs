//! Text canonicalization for fuzzy matching.
//!
//! Catalog names arrive with diacritics, punctuation variants, and uneven
//! spacing ("Hermès", "L'Eau d'Issey", "No. 5"). Matching happens over a
//! canonical key so "herme" still finds "Hermès". The pipeline: lowercase,
//! NFKD decomposition with combining marks stripped, drop everything outside
//! `[a-z0-9 ]`, collapse whitespace.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize text into a matching key.
///
/// Total and idempotent: any input yields a (possibly empty) key, and
/// `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();

    let mut folded = String::with_capacity(lowered.len());
    for c in lowered.nfkd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
            folded.push(c);
        }
    }

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
