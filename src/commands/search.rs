use anyhow::{Context, Result};
use scentdex::{
    catalog::load_catalog,
    config::Config,
    matching::CatalogMatcher,
};
use tracing::info;

/// Search the catalog and print ranked matches.
pub fn run(config: Config, query: String, limit: Option<usize>, format: String) -> Result<()> {
    info!("Searching for: {}", query);

    let entries = load_catalog(&config.catalog.path).with_context(|| {
        format!("Failed to load catalog from {}", config.catalog.path.display())
    })?;

    let limit = limit.unwrap_or(config.matching.limit);
    let matcher = CatalogMatcher::new(config.matching);
    let results = matcher.search(&query, &entries, limit);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No matches found. Try a different search term.");
        return Ok(());
    }

    println!("Found {} match(es):", results.len());
    for (rank, result) in results.iter().enumerate() {
        println!(
            "{:>3}. {}  ({}% match)",
            rank + 1,
            result.entry.full_name(),
            result.confidence
        );
        println!("     {}", result.entry.source_url);
    }

    Ok(())
}
