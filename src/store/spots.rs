//! SQLite table of scraped sightseeing-spot statistics

use std::path::{Path, PathBuf};

use rusqlite::params;

use super::{connect, StoreError};
use crate::scrape::SpotStats;

/// A stored spot row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotRecord {
    pub id: i64,
    pub spot_name: String,
    pub text_length: i64,
    pub section_count: i64,
}

/// Spot statistics backed by a SQLite file
///
/// Rows are appended; scraping the same article twice stores it twice.
#[derive(Debug, Clone)]
pub struct SpotStore {
    path: PathBuf,
}

impl SpotStore {
    /// Opens the store, creating the file and schema if needed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        let conn = connect(&store.path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS spots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                spot_name TEXT,
                text_length INTEGER,
                section_count INTEGER
            );
            "#,
        )?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one spot and returns its row id
    pub fn insert(&self, spot: &SpotStats) -> Result<i64, StoreError> {
        let conn = connect(&self.path)?;
        conn.execute(
            "INSERT INTO spots (spot_name, text_length, section_count) VALUES (?1, ?2, ?3)",
            params![spot.title, spot.text_length as i64, spot.section_count as i64],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Loads every stored spot in insertion order
    pub fn load_all(&self) -> Result<Vec<SpotRecord>, StoreError> {
        let conn = connect(&self.path)?;
        let mut stmt = conn
            .prepare("SELECT id, spot_name, text_length, section_count FROM spots ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(SpotRecord {
                id: row.get(0)?,
                spot_name: row.get(1)?,
                text_length: row.get(2)?,
                section_count: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spot(title: &str, text_length: usize, section_count: usize) -> SpotStats {
        SpotStats {
            title: title.to_string(),
            text_length,
            section_count,
        }
    }

    #[test]
    fn test_insert_and_load_all() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SpotStore::open(temp_dir.path().join("travel.db")).expect("Store should open");

        let first = store.insert(&spot("金閣寺", 5120, 8)).expect("Insert");
        let second = store.insert(&spot("富士山", 20480, 15)).expect("Insert");
        let rows = store.load_all().expect("Load");

        assert!(second > first);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spot_name, "金閣寺");
        assert_eq!(rows[0].text_length, 5120);
        assert_eq!(rows[1].section_count, 15);
    }

    #[test]
    fn test_duplicate_spots_are_appended() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SpotStore::open(temp_dir.path().join("travel.db")).expect("Store should open");

        store.insert(&spot("金閣寺", 1, 1)).expect("Insert");
        store.insert(&spot("金閣寺", 1, 1)).expect("Insert");

        assert_eq!(store.load_all().expect("Load").len(), 2);
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SpotStore::open(temp_dir.path().join("travel.db")).expect("Store should open");

        assert!(store.load_all().expect("Load").is_empty());
        assert!(store.path().exists());
    }
}
