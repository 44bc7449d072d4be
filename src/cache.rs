//! Profile cache keyed by source URL
//!
//! Uses the sled embedded database for on-disk persistence with atomic
//! per-key upserts and lock-free concurrent readers. Entries never expire:
//! once a page has been scraped successfully, every later lookup is served
//! from disk. Failed scrapes are never written, so they are retried on the
//! next request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::types::ScrapedProfile;

/// Errors from the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache database error: {0}")]
    Db(#[from] sled::Error),
    #[error("cache codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// A cached profile with its write timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredProfile {
    profile: ScrapedProfile,
    stored_at: DateTime<Utc>,
}

/// Persistent URL-keyed profile store.
pub struct ProfileCache {
    db: sled::Db,
}

impl ProfileCache {
    /// Open (or create) the cache database under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let db = sled::open(data_dir.as_ref().join("profiles.sled"))?;
        Ok(Self { db })
    }

    /// Look up a profile by source URL.
    ///
    /// A corrupt entry is treated as a miss so one bad record cannot wedge
    /// the lookup path; it will be overwritten by the next successful scrape.
    pub fn get(&self, url: &str) -> Result<Option<ScrapedProfile>, CacheError> {
        let Some(raw) = self.db.get(url.as_bytes())? else {
            return Ok(None);
        };
        match bincode::deserialize::<StoredProfile>(&raw) {
            Ok(stored) => Ok(Some(stored.profile)),
            Err(e) => {
                warn!("Discarding undecodable cache entry for {}: {}", url, e);
                Ok(None)
            }
        }
    }

    /// Upsert a profile under its source URL. Overwrites any prior value and
    /// flushes so the entry survives an immediate process exit.
    pub fn put(&self, url: &str, profile: &ScrapedProfile) -> Result<(), CacheError> {
        let stored = StoredProfile {
            profile: profile.clone(),
            stored_at: Utc::now(),
        };
        let data = bincode::serialize(&stored)?;
        self.db.insert(url.as_bytes(), data)?;
        self.db.flush()?;
        Ok(())
    }

    /// When the entry for `url` was written, if present.
    pub fn stored_at(&self, url: &str) -> Option<DateTime<Utc>> {
        let raw = self.db.get(url.as_bytes()).ok().flatten()?;
        bincode::deserialize::<StoredProfile>(&raw)
            .ok()
            .map(|stored| stored.stored_at)
    }

    /// Number of cached profiles.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Bytes used on disk.
    pub fn size_on_disk(&self) -> Result<u64, CacheError> {
        Ok(self.db.size_on_disk()?)
    }

    /// Drop every cached profile.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), CacheError> {
        self.db.flush()?;
        Ok(())
    }
}
