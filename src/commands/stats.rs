use anyhow::{Context, Result};
use scentdex::{cache::ProfileCache, config::Config};

/// Print cache statistics.
pub fn run(config: Config) -> Result<()> {
    let cache = ProfileCache::open(&config.cache.data_dir).with_context(|| {
        format!(
            "Failed to open cache at {}",
            config.cache.data_dir.display()
        )
    })?;

    println!("Cache directory: {}", config.cache.data_dir.display());
    println!("Cached profiles: {}", cache.len());
    if let Ok(bytes) = cache.size_on_disk() {
        println!("Size on disk:    {} KiB", bytes / 1024);
    }

    Ok(())
}
