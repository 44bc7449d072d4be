//! Profile scraping coordinator
//!
//! Composes the cache, the fetcher, and the extractors into one operation:
//! given a catalog entry, produce its enriched profile. Cache hits short-
//! circuit everything. Fetch failures produce an error-carrying profile that
//! is returned but never cached, so the next request retries. Extraction
//! gaps are silent; a page that yields nothing still produces a (cached)
//! profile with empty fields.

use scraper::Html;
use tracing::{debug, warn};

use super::fetcher::PageFetcher;
use super::fields::{visible_text, FieldExtractor};
use super::notes::NotePyramidExtractor;
use crate::cache::ProfileCache;
use crate::config::ScrapingConfig;
use crate::types::{CatalogEntry, ScrapedProfile};

/// Orchestrates cache lookup, fetching, and extraction for one entry at a
/// time.
pub struct ProfileScraper {
    fetcher: PageFetcher,
    notes: NotePyramidExtractor,
    fields: FieldExtractor,
    /// Absent when the cache could not be opened; the scraper then degrades
    /// to fetching on every request instead of failing.
    cache: Option<ProfileCache>,
}

impl ProfileScraper {
    /// Build the scraper from configuration and an optional cache handle.
    pub fn new(config: &ScrapingConfig, cache: Option<ProfileCache>) -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            notes: NotePyramidExtractor::new(config.notes.clone()),
            fields: FieldExtractor::new(config.fields.clone())?,
            cache,
        })
    }

    /// Produce the enriched profile for a catalog entry.
    ///
    /// Never returns an `Err`: a failed fetch is reported through the
    /// profile's `error` field so the caller can show it alongside the
    /// source link.
    pub async fn profile(&self, entry: &CatalogEntry) -> ScrapedProfile {
        let url = &entry.source_url;

        if let Some(cache) = &self.cache {
            match cache.get(url) {
                Ok(Some(profile)) => {
                    debug!("Cache hit for {}", url);
                    return profile;
                }
                Ok(None) => {}
                Err(e) => warn!("Cache read failed for {}: {}; fetching directly", url, e),
            }
        }

        let html = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                return ScrapedProfile::from_error(url, e.to_string());
            }
        };

        let profile = self.extract_profile(url, &html);

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(url, &profile) {
                warn!("Cache write failed for {}: {}", url, e);
            }
        }

        profile
    }

    /// Run every extractor over an already-fetched page. Each extractor is
    /// independent; one coming up empty never affects the others.
    pub fn extract_profile(&self, url: &str, html: &str) -> ScrapedProfile {
        let notes = self.notes.extract(html);

        let document = Html::parse_document(html);
        let text = visible_text(&document);

        ScrapedProfile {
            source_url: url.to_string(),
            notes,
            rating: self.fields.rating(&text),
            longevity: self.fields.longevity(&text),
            sillage: self.fields.sillage(&text),
            accords: self.fields.accords(&text),
            description: self.fields.description(&text, &document),
            error: None,
        }
    }

    /// Whether a cache is attached.
    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }
}
