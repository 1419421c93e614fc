//! Local persistence for forecasts, the area catalog and scraped spots
//!
//! The area catalog is cached as a JSON file with a TTL, returning expired
//! entries with an `is_expired` flag so the app can keep working offline.
//! Forecasts and spot statistics live in SQLite files; every operation opens
//! its own connection.

mod catalog;
mod forecasts;
mod spots;

pub use catalog::{CachedCatalog, CatalogCache};
pub use forecasts::{ForecastStore, StoredForecast};
pub use spots::{SpotRecord, SpotStore};

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

/// Errors that can occur while reading or writing a local store
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite rejected an operation
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database directory could not be created
    #[error("Failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Opens a connection, creating the parent directory on first use
fn connect(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(Connection::open(path)?)
}
