//! Scalar field extraction from page text
//!
//! Each extractor works over the document's flattened visible text and
//! returns an `Option`; a field the page doesn't carry is simply absent,
//! never an error. Patterns are compiled once at construction.

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::util::truncate_chars;

/// The accord vocabulary, in presentation order. Matches are reported in
/// this order regardless of where they occur in the text.
pub const ACCORD_VOCABULARY: &[&str] = &[
    "Fresh", "Fruity", "Citrus", "Woody", "Smoky", "Floral", "Spicy", "Sweet", "Powdery",
    "Musky", "Green", "Aquatic", "Oriental", "Balsamic", "Earthy", "Leather", "Amber",
    "Vanilla", "Aromatic", "Ozonic", "Warm", "Creamy", "Resinous", "Animalic", "Gourmand",
    "Tobacco", "Boozy", "Synthetic", "Mossy", "Herbal", "Soapy", "Marine",
];

/// Tuning knobs for field extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    /// Description length cap in characters
    pub description_cap: usize,
    /// Maximum accords reported
    pub accord_cap: usize,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            description_cap: 500,
            accord_cap: 6,
        }
    }
}

/// Extracts rating, description, accords, longevity, and sillage.
pub struct FieldExtractor {
    config: FieldsConfig,
    rating_with_count: Regex,
    rating_any: Regex,
    description_pattern: Regex,
    accord_block: Regex,
    longevity_pattern: Regex,
    sillage_pattern: Regex,
    meta_description: Option<Selector>,
}

impl FieldExtractor {
    /// Compile all extraction patterns.
    pub fn new(config: FieldsConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            config,
            // Preferred form: the score right next to its ratings count.
            rating_with_count: Regex::new(r"(\d+\.?\d*)\s*/\s*10\s*\n?\s*\d+\s*Ratings")?,
            // Fallback: any single-decimal score out of ten.
            rating_any: Regex::new(r"(\d+\.\d)\s*/\s*10")?,
            description_pattern: Regex::new(
                r"(A\s+(?:popular\s+)?(?:limited\s+)?perfume\s+by\s+[^.]+\.(?:\s+[^.]+\.){0,2})",
            )?,
            accord_block: Regex::new(
                r"Main accords\s*([\s\S]*?)(?:SMELL|Fragrance Pyramid|Ratings|$)",
            )?,
            longevity_pattern: Regex::new(r"Longevity\s*(\d+\.?\d*)")?,
            sillage_pattern: Regex::new(r"Sillage\s*(\d+\.?\d*)")?,
            meta_description: Selector::parse(r#"meta[name="description"]"#).ok(),
        })
    }

    /// Community rating on the 0-10 scale.
    pub fn rating(&self, text: &str) -> Option<f64> {
        let captures = self
            .rating_with_count
            .captures(text)
            .or_else(|| self.rating_any.captures(text))?;
        let value: f64 = captures.get(1)?.as_str().parse().ok()?;
        (0.0..=10.0).contains(&value).then_some(value)
    }

    /// Editorial description: the "A perfume by ..." sentence plus up to two
    /// follow-on sentences, whitespace collapsed; falls back to the page's
    /// description metadata.
    pub fn description(&self, text: &str, document: &Html) -> Option<String> {
        if let Some(found) = self
            .description_pattern
            .captures(text)
            .and_then(|c| c.get(1))
        {
            let collapsed = found
                .as_str()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            return Some(truncate_chars(&collapsed, self.config.description_cap));
        }

        let selector = self.meta_description.as_ref()?;
        let content = document.select(selector).next()?.value().attr("content")?;
        Some(truncate_chars(content, self.config.description_cap))
    }

    /// Dominant accords: vocabulary words present in the block following the
    /// "Main accords" label, reported in vocabulary order.
    pub fn accords(&self, text: &str) -> Vec<String> {
        let Some(block) = self.accord_block.captures(text).and_then(|c| c.get(1)) else {
            return Vec::new();
        };
        let block = block.as_str();
        ACCORD_VOCABULARY
            .iter()
            .filter(|accord| block.contains(*accord))
            .take(self.config.accord_cap)
            .map(|s| s.to_string())
            .collect()
    }

    /// Longevity rating.
    pub fn longevity(&self, text: &str) -> Option<f64> {
        labeled_number(&self.longevity_pattern, text)
    }

    /// Sillage rating.
    pub fn sillage(&self, text: &str) -> Option<f64> {
        labeled_number(&self.sillage_pattern, text)
    }
}

fn labeled_number(pattern: &Regex, text: &str) -> Option<f64> {
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Flatten a document into visible text: script, style, and noscript
/// subtrees are skipped, block elements introduce line breaks, and runs of
/// inline text are joined with single spaces.
pub fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    let mut last_was_block = false;

    for node in document.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"))
            });
            if hidden {
                continue;
            }
            let t = text_node.trim();
            if !t.is_empty() {
                if last_was_block {
                    text.push('\n');
                } else if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(t);
                last_was_block = false;
            }
        } else if let Some(element) = node.value().as_element() {
            let is_block = matches!(
                element.name(),
                "p" | "div"
                    | "br"
                    | "h1"
                    | "h2"
                    | "h3"
                    | "h4"
                    | "h5"
                    | "h6"
                    | "li"
                    | "tr"
                    | "blockquote"
                    | "section"
            );
            if is_block {
                last_was_block = true;
            }
        }
    }

    text
}
