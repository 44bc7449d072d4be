//! Note pyramid extraction
//!
//! The source pages carry no schema contract: the pyramid may be marked up
//! with section tokens, with marker images, or not at all. Extraction runs
//! three tiers, each attempted only when the previous one recovered nothing:
//!
//! 1. Marker slices: cut the markup at the first occurrence of the three
//!    pyramid section tokens and read image alt text out of each slice.
//! 2. Ordered image walk: track the current pyramid level while walking all
//!    images in document order, switching level at marker images.
//! 3. Flat scan: collect alt text from anything that looks like a note icon
//!    into a single unlabeled list.
//!
//! The pipeline is total: malformed input can only degrade the result to an
//! empty pyramid, never abort it.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::types::Notes;
use crate::util::floor_char_boundary;

/// Section marker tokens as they appear in the markup.
const TOP_MARKER: &str = "pyr_top";
const HEART_MARKER: &str = "pyr_middle";
const BASE_MARKER: &str = "pyr_base";

/// Per-section labels that identify caption images rather than notes.
const TOP_NOISE: &[&str] = &["Top", "Notes"];
const HEART_NOISE: &[&str] = &["Heart", "Middle", "Notes"];
const BASE_NOISE: &[&str] = &["Base", "Notes"];

/// Rejected case-insensitively in every section: alt text echoing a marker.
const MARKER_NOISE: &str = "pyr";

/// Tuning knobs for note extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Candidates at or above this many characters are discarded
    pub max_note_len: usize,
    /// Markup window read after the base marker; the base section has no
    /// closing marker, so this bound is heuristic rather than structural
    pub base_slice_window: usize,
    /// Maximum notes collected by the flat fallback
    pub flat_cap: usize,
    /// A base-section candidate containing any of these words signals the
    /// slice ran past the pyramid into an unrelated section; collection stops
    pub base_sentinels: Vec<String>,
    /// Substrings that must all appear in an image src for it to count as a
    /// note icon during the ordered walk
    pub note_icon_patterns: Vec<String>,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            max_note_len: 40,
            base_slice_window: 2000,
            flat_cap: 15,
            base_sentinels: vec![
                "Rating".to_string(),
                "Scent".to_string(),
                "Review".to_string(),
            ],
            note_icon_patterns: vec!["media.parfumo".to_string(), "/notes/".to_string()],
        }
    }
}

#[derive(Clone, Copy)]
enum Level {
    Top,
    Heart,
    Base,
}

/// Three-tier note extractor. Selectors are compiled once at construction;
/// a selector that fails to compile disables its tier rather than failing
/// the pipeline.
pub struct NotePyramidExtractor {
    config: NotesConfig,
    img_selector: Option<Selector>,
    alt_selector: Option<Selector>,
}

impl NotePyramidExtractor {
    pub fn new(config: NotesConfig) -> Self {
        Self {
            config,
            img_selector: Selector::parse("img").ok(),
            alt_selector: Selector::parse("[alt]").ok(),
        }
    }

    /// Extract notes from raw page markup. Never fails; the worst case is an
    /// empty pyramid.
    pub fn extract(&self, html: &str) -> Notes {
        let by_markers = self.from_marker_slices(html);
        if !by_markers.is_empty() {
            return by_markers;
        }

        let document = Html::parse_document(html);

        let by_walk = self.from_image_walk(&document);
        if !by_walk.is_empty() {
            return by_walk;
        }

        let flat = self.from_flat_scan(&document);
        if !flat.is_empty() {
            return flat;
        }

        Notes::empty_pyramid()
    }

    /// Tier 1: slice the markup at the three section markers and read alt
    /// text out of each slice. Requires all three markers, in order. The
    /// base slice is bounded by `base_slice_window` since no closing marker
    /// exists.
    fn from_marker_slices(&self, html: &str) -> Notes {
        let (Some(top_pos), Some(heart_pos), Some(base_pos)) = (
            html.find(TOP_MARKER),
            html.find(HEART_MARKER),
            html.find(BASE_MARKER),
        ) else {
            return Notes::empty_pyramid();
        };
        if !(top_pos < heart_pos && heart_pos < base_pos) {
            return Notes::empty_pyramid();
        }

        let base_end = floor_char_boundary(
            html,
            base_pos.saturating_add(self.config.base_slice_window),
        );

        Notes::Pyramid {
            top: self.section_notes(&html[top_pos..heart_pos], TOP_NOISE, false),
            heart: self.section_notes(&html[heart_pos..base_pos], HEART_NOISE, false),
            base: self.section_notes(&html[base_pos..base_end], BASE_NOISE, true),
        }
    }

    /// Collect note candidates from one section slice, preserving document
    /// order and dropping duplicates.
    fn section_notes(&self, slice: &str, noise: &[&str], sentinel_stop: bool) -> Vec<String> {
        let mut notes: Vec<String> = Vec::new();
        for alt in self.alt_values(slice) {
            if !self.keep_candidate(&alt, noise) {
                continue;
            }
            if sentinel_stop
                && self
                    .config
                    .base_sentinels
                    .iter()
                    .any(|sentinel| alt.contains(sentinel.as_str()))
            {
                // Overran the pyramid into an unrelated section.
                break;
            }
            if !notes.contains(&alt) {
                notes.push(alt);
            }
        }
        notes
    }

    /// All alt attribute values in a markup slice, in document order.
    fn alt_values(&self, markup: &str) -> Vec<String> {
        let Some(selector) = &self.alt_selector else {
            return Vec::new();
        };
        let fragment = Html::parse_fragment(markup);
        fragment
            .select(selector)
            .filter_map(|element| element.value().attr("alt"))
            .map(str::to_string)
            .collect()
    }

    fn keep_candidate(&self, alt: &str, noise: &[&str]) -> bool {
        !alt.is_empty()
            && alt.chars().count() < self.config.max_note_len
            && !noise.iter().any(|token| alt.contains(token))
            && !alt.to_lowercase().contains(MARKER_NOISE)
    }

    /// Tier 2: walk every image in document order, switching pyramid level
    /// at marker images and collecting alt text from note icons.
    fn from_image_walk(&self, document: &Html) -> Notes {
        let Some(selector) = &self.img_selector else {
            return Notes::empty_pyramid();
        };

        let mut top: Vec<String> = Vec::new();
        let mut heart: Vec<String> = Vec::new();
        let mut base: Vec<String> = Vec::new();
        let mut level: Option<Level> = None;

        for img in document.select(selector) {
            let src = img.value().attr("src").unwrap_or("");
            let alt = img.value().attr("alt").unwrap_or("");

            // Marker images switch level; their own alt text is never a note.
            if src.contains(TOP_MARKER) {
                level = Some(Level::Top);
                continue;
            }
            if src.contains(HEART_MARKER) {
                level = Some(Level::Heart);
                continue;
            }
            if src.contains(BASE_MARKER) {
                level = Some(Level::Base);
                continue;
            }

            let Some(current) = level else {
                continue;
            };
            if !self.is_note_icon(src) {
                continue;
            }
            if alt.is_empty() || alt.chars().count() >= self.config.max_note_len {
                continue;
            }

            let bucket = match current {
                Level::Top => &mut top,
                Level::Heart => &mut heart,
                Level::Base => &mut base,
            };
            if !bucket.iter().any(|n| n == alt) {
                bucket.push(alt.to_string());
            }
        }

        Notes::Pyramid { top, heart, base }
    }

    fn is_note_icon(&self, src: &str) -> bool {
        !self.config.note_icon_patterns.is_empty()
            && self
                .config
                .note_icon_patterns
                .iter()
                .all(|pattern| src.contains(pattern.as_str()))
    }

    /// Tier 3: anything that vaguely looks like a note icon goes into one
    /// unlabeled list, bounded by `flat_cap`.
    fn from_flat_scan(&self, document: &Html) -> Notes {
        let Some(selector) = &self.img_selector else {
            return Notes::empty_pyramid();
        };

        let mut all: Vec<String> = Vec::new();
        for img in document.select(selector) {
            let src = img.value().attr("src").unwrap_or("");
            let Some(alt) = img.value().attr("alt") else {
                continue;
            };
            if alt.is_empty() || alt.chars().count() >= self.config.max_note_len {
                continue;
            }
            if !src.to_lowercase().contains("notes") {
                continue;
            }
            if !all.iter().any(|n| n == alt) {
                all.push(alt.to_string());
                if all.len() >= self.config.flat_cap {
                    break;
                }
            }
        }

        if all.is_empty() {
            Notes::empty_pyramid()
        } else {
            Notes::Flat(all)
        }
    }
}

impl Default for NotePyramidExtractor {
    fn default() -> Self {
        Self::new(NotesConfig::default())
    }
}
