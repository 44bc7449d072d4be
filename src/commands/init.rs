use anyhow::{Context, Result};
use scentdex::config::Config;
use std::path::PathBuf;

/// Write a default configuration file into `path`.
pub fn run(path: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create directory {}", path.display()))?;

    let target = path.join("config.toml");
    if target.exists() {
        anyhow::bail!("{} already exists; refusing to overwrite", target.display());
    }

    let rendered = toml::to_string_pretty(&Config::default())
        .context("Failed to render default configuration")?;
    std::fs::write(&target, rendered)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    println!("Wrote {}", target.display());
    println!("Point catalog.path at your fragrance CSV, then run:");
    println!("  scentdex search \"chanel no 5\"");

    Ok(())
}
