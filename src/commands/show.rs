use anyhow::{Context, Result};
use scentdex::{
    cache::ProfileCache,
    catalog::load_catalog,
    config::Config,
    matching::CatalogMatcher,
    scraping::ProfileScraper,
    summary::{GroqSummarizer, Summarizer},
    types::{MatchResult, Notes, ScrapedProfile},
};
use tracing::{info, warn};

/// Search, pick one match, and print its enriched profile.
pub async fn run(config: Config, query: String, pick: usize, format: String) -> Result<()> {
    let entries = load_catalog(&config.catalog.path).with_context(|| {
        format!("Failed to load catalog from {}", config.catalog.path.display())
    })?;

    let limit = config.matching.limit.max(pick);
    let matcher = CatalogMatcher::new(config.matching.clone());
    let results = matcher.search(&query, &entries, limit);

    if results.is_empty() {
        println!("No matches found. Try a different search term.");
        return Ok(());
    }

    let Some(selected) = results.get(pick.saturating_sub(1)) else {
        anyhow::bail!(
            "Only {} match(es) found; --pick {} is out of range",
            results.len(),
            pick
        );
    };

    info!("Fetching details for {}", selected.entry.full_name());

    // A broken cache degrades to fetch-without-cache; it is an optimization,
    // not a correctness requirement.
    let cache = match ProfileCache::open(&config.cache.data_dir) {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!("Cache unavailable ({}); fetching without cache", e);
            None
        }
    };

    let scraper = ProfileScraper::new(&config.scraping, cache)?;
    let profile = scraper.profile(&selected.entry).await;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    print_profile(selected, &profile);

    // The summarizer is an optional capability; absent key, absent summary.
    if !profile.is_error() {
        if let Some(summarizer) = GroqSummarizer::from_config(&config.summary) {
            match summarizer.summarize(&selected.entry.full_name(), &profile).await {
                Some(summary) => println!("\nSummary\n  {}", summary),
                None => println!("\nSummary\n  (no summary available)"),
            }
        }
    }

    Ok(())
}

fn print_profile(selected: &MatchResult, profile: &ScrapedProfile) {
    println!("{}", selected.entry.full_name());
    println!("Match confidence: {}%", selected.confidence);
    println!();

    if let Some(error) = &profile.error {
        println!("Could not fetch details: {}", error);
        println!("View the source page: {}", profile.source_url);
        return;
    }

    match &profile.notes {
        Notes::Pyramid { top, heart, base } if !profile.notes.is_empty() => {
            println!("Fragrance pyramid");
            if !top.is_empty() {
                println!("  Top:   {}", top.join(", "));
            }
            if !heart.is_empty() {
                println!("  Heart: {}", heart.join(", "));
            }
            if !base.is_empty() {
                println!("  Base:  {}", base.join(", "));
            }
        }
        Notes::Flat(all) if !all.is_empty() => {
            println!("Notes: {}", all.join(", "));
        }
        _ => {}
    }

    if let Some(rating) = profile.rating {
        println!("Rating:    {}/10", rating);
    }
    if let Some(longevity) = profile.longevity {
        println!("Longevity: {}/10", longevity);
    }
    if let Some(sillage) = profile.sillage {
        println!("Sillage:   {}/10", sillage);
    }
    if !profile.accords.is_empty() {
        println!("Accords:   {}", profile.accords.join(", "));
    }
    if let Some(description) = &profile.description {
        println!("\n{}", description);
    }

    println!("\nSource: {}", profile.source_url);
}
