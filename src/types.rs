//! Core types for the scentdex catalog and enrichment pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::matching::normalize;

/// A single fragrance in the catalog.
///
/// The `normalized_key` is derived from "brand name" at load time and is the
/// only field the matcher scores against; it is never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Brand / house name
    pub brand: String,
    /// Fragrance name
    pub name: String,
    /// Source page URL used for enrichment and as the cache key
    pub source_url: String,
    /// Canonical diacritic-folded key used for matching
    pub normalized_key: String,
}

impl CatalogEntry {
    /// Create an entry, deriving the normalized matching key.
    pub fn new(
        brand: impl Into<String>,
        name: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        let brand = brand.into();
        let name = name.into();
        let normalized_key = normalize(&format!("{} {}", brand, name));
        Self {
            brand,
            name,
            source_url: source_url.into(),
            normalized_key,
        }
    }

    /// Display name combining brand and fragrance name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.brand, self.name)
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.brand, self.name)
    }
}

/// A ranked search hit produced for one query. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub entry: CatalogEntry,
    /// Similarity confidence in [0, 100]
    pub confidence: u8,
}

/// Fragrance notes recovered from a scraped page.
///
/// The two variants are mutually exclusive: either the page yielded a proper
/// top/heart/base pyramid, or only an unlabeled flat list could be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notes {
    /// Classic three-level pyramid
    Pyramid {
        top: Vec<String>,
        heart: Vec<String>,
        base: Vec<String>,
    },
    /// Unlabeled fallback list (bounded at extraction time)
    Flat(Vec<String>),
}

impl Notes {
    /// The pyramid with no notes at all — the pipeline's worst-case output.
    pub fn empty_pyramid() -> Self {
        Notes::Pyramid {
            top: Vec::new(),
            heart: Vec::new(),
            base: Vec::new(),
        }
    }

    /// True if no note was recovered in any position.
    pub fn is_empty(&self) -> bool {
        match self {
            Notes::Pyramid { top, heart, base } => {
                top.is_empty() && heart.is_empty() && base.is_empty()
            }
            Notes::Flat(all) => all.is_empty(),
        }
    }

    /// Total number of notes across all positions.
    pub fn len(&self) -> usize {
        match self {
            Notes::Pyramid { top, heart, base } => top.len() + heart.len() + base.len(),
            Notes::Flat(all) => all.len(),
        }
    }
}

impl Default for Notes {
    fn default() -> Self {
        Notes::empty_pyramid()
    }
}

/// Structured attributes recovered from one source page.
///
/// When `error` is set the fetch failed and every enrichment field is left at
/// its empty default; such profiles are returned to the caller but never
/// written to the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedProfile {
    /// The page this profile was scraped from (cache key)
    pub source_url: String,
    /// Note pyramid or flat note list
    #[serde(default)]
    pub notes: Notes,
    /// Community rating on a 0-10 scale
    pub rating: Option<f64>,
    /// Longevity rating
    pub longevity: Option<f64>,
    /// Sillage rating
    pub sillage: Option<f64>,
    /// Dominant accords, in vocabulary order, at most six
    #[serde(default)]
    pub accords: Vec<String>,
    /// Editorial description, truncated to 500 characters
    pub description: Option<String>,
    /// Fetch failure reason; set only when enrichment was impossible
    pub error: Option<String>,
}

impl ScrapedProfile {
    /// An empty profile for a URL, before extraction fills it in.
    pub fn empty(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            notes: Notes::default(),
            rating: None,
            longevity: None,
            sillage: None,
            accords: Vec::new(),
            description: None,
            error: None,
        }
    }

    /// A profile representing a failed fetch. Never cached.
    pub fn from_error(source_url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::empty(source_url)
        }
    }

    /// True if this profile records a fetch failure.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
