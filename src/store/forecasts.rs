//! SQLite cache for normalized forecasts
//!
//! One row per (area code, forecast date). Writing the same key again
//! replaces the weather text and fetch time; there is no history.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::params;
use tracing::debug;

use super::{connect, StoreError};
use crate::data::NormalizedForecastEntry;

/// Timestamp format for `fetched_at`, ISO 8601 with microseconds
const FETCHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A cached forecast row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredForecast {
    pub area_code: String,
    pub area_name: String,
    /// Calendar date, `YYYY-MM-DD`
    pub forecast_date: String,
    /// Normalized weather text
    pub weather: String,
    pub fetched_at: String,
}

/// Forecast cache backed by a SQLite file
#[derive(Debug, Clone)]
pub struct ForecastStore {
    path: PathBuf,
}

impl ForecastStore {
    /// Opens the store, creating the file and schema if needed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        store.init_schema()?;
        Ok(store)
    }

    /// Path of the SQLite file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = connect(&self.path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS weather_forecast (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                area_code TEXT,
                area_name TEXT,
                forecast_date TEXT,
                weather TEXT,
                fetched_at TEXT,
                UNIQUE(area_code, forecast_date)
            );
            "#,
        )?;
        Ok(())
    }

    /// Writes entries for an area, replacing rows with the same date
    ///
    /// # Returns
    /// The number of rows written
    pub fn upsert_entries(
        &self,
        area_code: &str,
        area_name: &str,
        entries: &[NormalizedForecastEntry],
        fetched_at: NaiveDateTime,
    ) -> Result<usize, StoreError> {
        let fetched_at = fetched_at.format(FETCHED_AT_FORMAT).to_string();
        let mut conn = connect(&self.path)?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO weather_forecast
                (area_code, area_name, forecast_date, weather, fetched_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(area_code, forecast_date) DO UPDATE SET
                    area_name = excluded.area_name,
                    weather = excluded.weather,
                    fetched_at = excluded.fetched_at
                "#,
            )?;

            for entry in entries {
                stmt.execute(params![
                    area_code,
                    area_name,
                    entry.date,
                    entry.weather,
                    fetched_at
                ])?;
            }
        }

        tx.commit()?;
        debug!(area_code, rows = entries.len(), "stored forecast entries");
        Ok(entries.len())
    }

    /// Loads all cached rows for an area, ordered by date
    pub fn load_area(&self, area_code: &str) -> Result<Vec<StoredForecast>, StoreError> {
        let conn = connect(&self.path)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT area_code, area_name, forecast_date, weather, fetched_at
            FROM weather_forecast
            WHERE area_code = ?1
            ORDER BY forecast_date
            "#,
        )?;

        let rows = stmt.query_map(params![area_code], |row| {
            Ok(StoredForecast {
                area_code: row.get(0)?,
                area_name: row.get(1)?,
                forecast_date: row.get(2)?,
                weather: row.get(3)?,
                fetched_at: row.get(4)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeatherIcon;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (ForecastStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store =
            ForecastStore::open(temp_dir.path().join("weather.db")).expect("Store should open");
        (store, temp_dir)
    }

    fn entry(date: &str, weather: &str) -> NormalizedForecastEntry {
        NormalizedForecastEntry {
            date: date.to_string(),
            time_define: format!("{}T00:00:00+09:00", date),
            raw_weather: weather.to_string(),
            weather: weather.to_string(),
            icon: WeatherIcon::Clear,
            wind: None,
            wave: None,
        }
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 15)
            .and_then(|d| d.and_hms_micro_opt(hour, 30, 0, 123456))
            .expect("valid timestamp")
    }

    #[test]
    fn test_upsert_and_load_in_date_order() {
        let (store, _temp_dir) = create_test_store();
        let entries = vec![entry("2024-07-16", "くもり"), entry("2024-07-15", "晴れ")];

        let written = store
            .upsert_entries("130000", "東京都", &entries, at(17))
            .expect("Upsert should succeed");
        let rows = store.load_area("130000").expect("Load should succeed");

        assert_eq!(written, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].forecast_date, "2024-07-15");
        assert_eq!(rows[0].weather, "晴れ");
        assert_eq!(rows[1].forecast_date, "2024-07-16");
        assert_eq!(rows[0].fetched_at, "2024-07-15T17:30:00.123456");
    }

    #[test]
    fn test_upsert_same_key_keeps_single_latest_row() {
        let (store, _temp_dir) = create_test_store();

        store
            .upsert_entries("130000", "東京都", &[entry("2024-07-15", "晴れ")], at(5))
            .expect("First upsert should succeed");
        store
            .upsert_entries("130000", "東京都", &[entry("2024-07-15", "雨")], at(17))
            .expect("Second upsert should succeed");

        let rows = store.load_area("130000").expect("Load should succeed");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].weather, "雨");
        assert_eq!(rows[0].fetched_at, "2024-07-15T17:30:00.123456");
    }

    #[test]
    fn test_areas_are_kept_apart() {
        let (store, _temp_dir) = create_test_store();

        store
            .upsert_entries("130000", "東京都", &[entry("2024-07-15", "晴れ")], at(5))
            .expect("Upsert should succeed");
        store
            .upsert_entries("016000", "石狩・空知・後志地方", &[entry("2024-07-15", "雪")], at(5))
            .expect("Upsert should succeed");

        assert_eq!(store.load_area("130000").expect("Load").len(), 1);
        assert_eq!(store.load_area("016000").expect("Load")[0].weather, "雪");
        assert!(store.load_area("999999").expect("Load").is_empty());
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let (store, _temp_dir) = create_test_store();
        store
            .upsert_entries("130000", "東京都", &[entry("2024-07-15", "晴れ")], at(5))
            .expect("Upsert should succeed");

        let reopened = ForecastStore::open(store.path().to_path_buf()).expect("Reopen");

        assert_eq!(reopened.load_area("130000").expect("Load").len(), 1);
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("weather.db");

        ForecastStore::open(path.clone()).expect("Store should open");

        assert!(path.exists());
    }
}
