//! Forecast loading for one area selection
//!
//! Fetches the forecast, resolves it into display rows and, in caching mode,
//! writes the rows to SQLite and shows them back from there.

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{info, warn};

use crate::data::resolver::DEFAULT_DAY_LIMIT;
use crate::data::{day_label, resolve, weather_icon, AreaCatalog, JmaClient, JmaError, WeatherIcon};
use crate::store::{CatalogCache, ForecastStore, StoreError};

/// Errors that can occur when loading a forecast
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The forecast could not be fetched or parsed
    #[error(transparent)]
    Fetch(#[from] JmaError),

    /// The response had no time series with weather text
    #[error("No weather data available for area {0}")]
    NoWeatherData(String),

    /// Reading or writing the forecast cache failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure categories shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Payload,
    NoData,
    Storage,
}

impl ForecastError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ForecastError::Fetch(e) if e.is_network() => FailureKind::Network,
            ForecastError::Fetch(_) => FailureKind::Payload,
            ForecastError::NoWeatherData(_) => FailureKind::NoData,
            ForecastError::Store(_) => FailureKind::Storage,
        }
    }
}

/// Where the rows of an `AreaView` came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSource {
    Live,
    Cache,
}

/// One displayed forecast day
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// "今日"/"明日"/"明後日" for live rows, the date for cached rows
    pub label: String,
    pub date: String,
    pub icon: WeatherIcon,
    pub weather: String,
    /// Extra lines shown when the row is expanded (wind, waves)
    pub details: Vec<String>,
}

/// Everything the forecast panel shows for one area
#[derive(Debug, Clone, PartialEq)]
pub struct AreaView {
    pub title: String,
    /// Sub-area and publishing office, when known
    pub subtitle: Option<String>,
    pub rows: Vec<ForecastRow>,
    pub source: ViewSource,
}

/// Loads area lists and forecasts
#[derive(Debug, Clone)]
pub struct ForecastService {
    client: JmaClient,
    store: Option<ForecastStore>,
    catalog_cache: Option<CatalogCache>,
    catalog_ttl_hours: u64,
    day_limit: usize,
}

impl ForecastService {
    pub fn new(client: JmaClient) -> Self {
        Self {
            client,
            store: None,
            catalog_cache: None,
            catalog_ttl_hours: 24,
            day_limit: DEFAULT_DAY_LIMIT,
        }
    }

    /// Stores forecasts and displays them from the given store
    pub fn with_store(mut self, store: ForecastStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Caches the area catalog on disk
    pub fn with_catalog_cache(mut self, cache: CatalogCache, ttl_hours: u64) -> Self {
        self.catalog_cache = Some(cache);
        self.catalog_ttl_hours = ttl_hours;
        self
    }

    /// Loads the area catalog
    ///
    /// A fresh cached copy is used as-is. Otherwise the catalog is fetched and
    /// cached; if that fails, an expired cached copy is used instead.
    pub async fn load_areas(&self) -> Result<AreaCatalog, JmaError> {
        let cached = self.catalog_cache.as_ref().and_then(CatalogCache::read);

        if let Some(cached) = &cached {
            if !cached.is_expired {
                return Ok(cached.catalog.clone());
            }
        }

        match self.client.fetch_area_catalog().await {
            Ok(catalog) => {
                if let Some(cache) = &self.catalog_cache {
                    if let Err(e) = cache.write(&catalog, self.catalog_ttl_hours) {
                        warn!(error = %e, "failed to cache area catalog");
                    }
                }
                Ok(catalog)
            }
            Err(e) => match cached {
                Some(stale) => {
                    warn!(error = %e, cached_at = %stale.cached_at, "using stale area catalog");
                    Ok(stale.catalog)
                }
                None => Err(e),
            },
        }
    }

    /// Loads the forecast for one area
    pub async fn show_area(&self, area_code: &str, area_name: &str) -> Result<AreaView, ForecastError> {
        let reports = self.client.fetch_forecast(area_code).await?;
        // A weather series without dates yields no entries; stored rows must
        // not stand in for it.
        let resolved = resolve(&reports, self.day_limit)
            .filter(|r| !r.entries.is_empty())
            .ok_or_else(|| ForecastError::NoWeatherData(area_code.to_string()))?;

        let subtitle = report_subtitle(
            &resolved.area_name,
            resolved.publishing_office.as_deref(),
            resolved.report_datetime.as_deref(),
        );

        let Some(store) = &self.store else {
            let rows = resolved
                .entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let mut details = Vec::new();
                    if let Some(wind) = &entry.wind {
                        details.push(format!("風: {}", wind));
                    }
                    if let Some(wave) = &entry.wave {
                        details.push(format!("波: {}", wave));
                    }
                    ForecastRow {
                        label: day_label(i).unwrap_or(entry.date.as_str()).to_string(),
                        date: entry.date.clone(),
                        icon: entry.icon,
                        weather: entry.weather.clone(),
                        details,
                    }
                })
                .collect();

            return Ok(AreaView {
                title: format!("{} の天気予報", area_name),
                subtitle: Some(subtitle),
                rows,
                source: ViewSource::Live,
            });
        };

        let written = store.upsert_entries(
            area_code,
            area_name,
            &resolved.entries,
            Local::now().naive_local(),
        )?;
        info!(area_code, written, "cached forecast");

        // Older dates stay in the table but only the current window is shown.
        let first_date = resolved.entries[0].date.as_str();
        let rows = store
            .load_area(area_code)?
            .into_iter()
            .filter(|row| row.forecast_date.as_str() >= first_date)
            .take(self.day_limit)
            .map(|row| ForecastRow {
                label: row.forecast_date.clone(),
                icon: weather_icon(&row.weather),
                date: row.forecast_date,
                weather: row.weather,
                details: vec![format!("取得: {}", row.fetched_at)],
            })
            .collect();

        Ok(AreaView {
            title: format!("{} の天気予報（DB）", area_name),
            subtitle: Some(subtitle),
            rows,
            source: ViewSource::Cache,
        })
    }
}

/// "東京地方（気象庁 07/15 11:00発表）"
///
/// A report time that is not RFC 3339 is left out.
fn report_subtitle(area_name: &str, office: Option<&str>, reported_at: Option<&str>) -> String {
    let reported_at = reported_at
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.format("%m/%d %H:%M").to_string());

    match (office, reported_at) {
        (Some(office), Some(at)) => format!("{}（{} {}発表）", area_name, office, at),
        (Some(office), None) => format!("{}（{}発表）", area_name, office),
        (None, Some(at)) => format!("{}（{}発表）", area_name, at),
        (None, None) => area_name.to_string(),
    }
}
