//! Catalog loading
//!
//! The catalog is a headerless CSV of `brand,name,url` rows. Loading derives
//! each entry's normalized matching key once; the rest of the system treats
//! the resulting sequence as read-only. Malformed rows are skipped with a
//! warning rather than failing the whole load, since a single bad line in a
//! large export should not make the tool unusable.

use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::CatalogEntry;

/// Errors from catalog loading.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog file: {0}")]
    Open(#[from] csv::Error),
    #[error("catalog file contains no usable rows")]
    Empty,
}

/// Load catalog entries from a headerless CSV file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable catalog row {}: {}", line + 1, e);
                skipped += 1;
                continue;
            }
        };

        let (Some(brand), Some(name), Some(url)) =
            (record.get(0), record.get(1), record.get(2))
        else {
            warn!("Skipping short catalog row {}", line + 1);
            skipped += 1;
            continue;
        };

        let brand = brand.trim();
        let name = name.trim();
        let url = url.trim();
        if brand.is_empty() || name.is_empty() || url.is_empty() {
            warn!("Skipping blank catalog row {}", line + 1);
            skipped += 1;
            continue;
        }

        entries.push(CatalogEntry::new(brand, name, url));
    }

    if entries.is_empty() {
        return Err(CatalogError::Empty);
    }

    info!(
        "Loaded {} catalog entries ({} rows skipped)",
        entries.len(),
        skipped
    );
    Ok(entries)
}
