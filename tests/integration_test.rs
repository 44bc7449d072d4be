//! Integration tests for scentdex
//!
//! Exercise the search-then-enrich flow end to end without touching the
//! network: matching over a realistic catalog, extraction over a fixture
//! page, and cache persistence across handle lifetimes.

use scentdex::{
    cache::ProfileCache,
    config::{Config, ScrapingConfig},
    matching::{normalize, CatalogMatcher},
    scraping::{visible_text, FieldExtractor, FieldsConfig, NotePyramidExtractor, NotesConfig,
        ProfileScraper, ACCORD_VOCABULARY},
    types::{CatalogEntry, Notes, ScrapedProfile},
};
use tempfile::TempDir;

fn catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("Chanel", "No 5", "https://example.com/chanel-no-5"),
        CatalogEntry::new("Chanel", "Coco Mademoiselle", "https://example.com/coco"),
        CatalogEntry::new("Dior", "Sauvage", "https://example.com/sauvage"),
        CatalogEntry::new("Creed", "Aventus", "https://example.com/aventus"),
        CatalogEntry::new("Hermès", "Terre d'Hermès", "https://example.com/terre"),
        CatalogEntry::new("Guerlain", "Shalimar", "https://example.com/shalimar"),
    ]
}

/// A page shaped like the real thing: pyramid sections marked by tokens,
/// notes as image alt text, scalar fields in visible text.
const FIXTURE_PAGE: &str = r#"
<html>
<head>
    <title>Example Fragrance</title>
    <meta name="description" content="A fresh aromatic classic for warm days.">
</head>
<body>
    <h1>Example Fragrance</h1>
    <div>A popular perfume by Example House. It was launched in 2010. The nose behind this fragrance is A. Perfumer.</div>
    <div>Main accords Fresh Citrus Woody Aromatic Spicy Green Musky</div>
    <div>Fragrance Pyramid</div>
    <div class="pyr_top">
        <img src="/img/caption.png" alt="Top Notes">
        <img src="https://media.parfumo.example/notes/bergamot.jpg" alt="Bergamot">
        <img src="https://media.parfumo.example/notes/grapefruit.jpg" alt="Grapefruit">
    </div>
    <div class="pyr_middle">
        <img src="/img/caption.png" alt="Heart Notes">
        <img src="https://media.parfumo.example/notes/lavender.jpg" alt="Lavender">
    </div>
    <div class="pyr_base">
        <img src="/img/caption.png" alt="Base Notes">
        <img src="https://media.parfumo.example/notes/vetiver.jpg" alt="Vetiver">
        <img src="https://media.parfumo.example/notes/cedar.jpg" alt="Cedarwood">
        <img src="/img/star.png" alt="Scent chart">
        <img src="https://media.parfumo.example/notes/stray.jpg" alt="Stray Note">
    </div>
    <div>8.3 / 10 2041 Ratings</div>
    <div>Longevity 7.1</div>
    <div>Sillage 6.4</div>
</body>
</html>
"#;

#[test]
fn noisy_queries_resolve_to_the_right_entry() {
    let matcher = CatalogMatcher::new(Default::default());
    let entries = catalog();

    for (query, expected_name) in [
        ("chanel no5", "No 5"),
        ("terre dhermes", "Terre d'Hermès"),
        ("creed aventis", "Aventus"),
        ("shalimar", "Shalimar"),
    ] {
        let results = matcher.search(query, &entries, 5);
        assert!(!results.is_empty(), "no matches for {:?}", query);
        assert_eq!(results[0].entry.name, expected_name, "query {:?}", query);
        assert!(results[0].confidence > 50);
    }
}

#[test]
fn normalization_aligns_catalog_and_query() {
    assert_eq!(normalize("Terre d'Hermès"), normalize("terre dhermes"));
    assert_eq!(normalize("Déjà Vu"), normalize("deja vu"));
}

#[test]
fn fixture_page_yields_a_complete_profile() {
    let scraper = ProfileScraper::new(&ScrapingConfig::default(), None).unwrap();
    let profile = scraper.extract_profile("https://example.com/fixture", FIXTURE_PAGE);

    assert!(!profile.is_error());
    assert_eq!(profile.rating, Some(8.3));
    assert_eq!(profile.longevity, Some(7.1));
    assert_eq!(profile.sillage, Some(6.4));

    // Accord invariants: vocabulary members only, vocabulary order, capped.
    assert!(profile.accords.len() <= 6);
    let positions: Vec<usize> = profile
        .accords
        .iter()
        .map(|a| {
            ACCORD_VOCABULARY
                .iter()
                .position(|v| v == a)
                .expect("accord outside vocabulary")
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    // The sentinel image stops base collection before "Stray Note".
    assert_eq!(
        profile.notes,
        Notes::Pyramid {
            top: vec!["Bergamot".to_string(), "Grapefruit".to_string()],
            heart: vec!["Lavender".to_string()],
            base: vec!["Vetiver".to_string(), "Cedarwood".to_string()],
        }
    );

    let description = profile.description.expect("description present");
    assert!(description.starts_with("A popular perfume by Example House."));
    assert!(description.chars().count() <= 500);
}

#[test]
fn markerless_page_degrades_gracefully() {
    let extractor = NotePyramidExtractor::new(NotesConfig::default());

    // No markers, no note icons at all: empty pyramid, no panic.
    let bare = "<html><body><p>Nothing here</p></body></html>";
    assert!(extractor.extract(bare).is_empty());

    // No markers but note-ish icons: flat fallback.
    let flat_page = r#"
        <html><body>
        <img src="/assets/notes/iris.png" alt="Iris">
        <img src="/assets/notes/leather.png" alt="Leather">
        </body></html>
    "#;
    assert_eq!(
        extractor.extract(flat_page),
        Notes::Flat(vec!["Iris".to_string(), "Leather".to_string()])
    );
}

#[test]
fn cache_round_trips_across_handle_lifetimes() {
    let dir = TempDir::new().unwrap();
    let url = "https://example.com/cached";

    let mut profile = ScrapedProfile::empty(url);
    profile.rating = Some(8.3);
    profile.notes = Notes::Flat(vec!["Iris".to_string()]);

    {
        let cache = ProfileCache::open(dir.path()).unwrap();
        cache.put(url, &profile).unwrap();
        assert_eq!(cache.get(url).unwrap(), Some(profile.clone()));
    }

    // Fresh handle over the same directory: the entry must still be there.
    let cache = ProfileCache::open(dir.path()).unwrap();
    assert_eq!(cache.get(url).unwrap(), Some(profile));
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn fetch_failures_are_returned_but_not_cached() {
    let dir = TempDir::new().unwrap();
    let cache = ProfileCache::open(dir.path()).unwrap();
    let scraper = ProfileScraper::new(&ScrapingConfig::default(), Some(cache)).unwrap();

    let entry = CatalogEntry::new("Nowhere", "Ghost", "http://127.0.0.1:1/missing");
    let profile = scraper.profile(&entry).await;

    assert!(profile.is_error());
    assert_eq!(profile.source_url, "http://127.0.0.1:1/missing");

    // A second scraper over the same directory sees an empty cache.
    drop(scraper);
    let cache = ProfileCache::open(dir.path()).unwrap();
    assert!(cache.is_empty());
}

#[test]
fn default_config_wires_the_whole_pipeline() {
    let config = Config::default();
    assert!(config.validate().is_ok());

    let matcher = CatalogMatcher::new(config.matching.clone());
    assert!(matcher.search("", &catalog(), 5).is_empty());

    let fields = FieldExtractor::new(FieldsConfig::default()).unwrap();
    let document = scraper::Html::parse_document(FIXTURE_PAGE);
    let text = visible_text(&document);
    assert_eq!(fields.rating(&text), Some(8.3));
}
