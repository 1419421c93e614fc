//! Area catalog cache on disk
//!
//! Stores the JMA `offices` catalog as a JSON file with an expiry timestamp.
//! The catalog rarely changes, so a cached copy saves a request on every
//! start and keeps the area list available when the network is down.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::data::AreaCatalog;

const CATALOG_FILE: &str = "area_catalog.json";

/// Wrapper struct for the catalog stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CatalogEntry<T> {
    catalog: T,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Result of reading the cached catalog, including freshness metadata
#[derive(Debug)]
pub struct CachedCatalog {
    pub catalog: AreaCatalog,
    /// When the catalog was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the entry is past its TTL
    pub is_expired: bool,
}

/// Reads and writes the cached area catalog
///
/// Expired entries are still returned (with `is_expired = true`) so that a
/// failed catalog fetch can fall back to the last known list.
#[derive(Debug, Clone)]
pub struct CatalogCache {
    /// Directory holding the cache file
    cache_dir: PathBuf,
}

impl CatalogCache {
    /// Creates a cache rooted at the given directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(CATALOG_FILE)
    }

    /// Writes the catalog with a TTL in hours
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn write(&self, catalog: &AreaCatalog, ttl_hours: u64) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let now = Utc::now();
        let entry = CatalogEntry {
            catalog,
            cached_at: now,
            expires_at: now + Duration::hours(ttl_hours as i64),
        };

        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.cache_path(), json)
    }

    /// Reads the cached catalog
    ///
    /// Returns `None` if there is no cache file or it cannot be parsed.
    pub fn read(&self) -> Option<CachedCatalog> {
        let content = fs::read_to_string(self.cache_path()).ok()?;
        let entry: CatalogEntry<AreaCatalog> = serde_json::from_str(&content).ok()?;

        Some(CachedCatalog {
            catalog: entry.catalog,
            cached_at: entry.cached_at,
            is_expired: Utc::now() > entry.expires_at,
        })
    }
}
