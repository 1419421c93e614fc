//! Core data models for the JMA forecast browser
//!
//! This module contains the wire types for the JMA area catalog and forecast
//! payloads, plus the normalized entries derived from them.

pub mod jma;
pub mod resolver;

pub use jma::{JmaClient, JmaError};
pub use resolver::{
    build_entries, day_label, find_weather_series, normalize_weather_text, resolve,
    select_land_area, weather_icon, ResolvedForecast, WeatherIcon, MARITIME_MARKER,
};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The `offices` section of the JMA area catalog
///
/// Keyed by area code. A `BTreeMap` keeps iteration ordered by code, which is
/// also the order the catalog publishes them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaCatalog {
    pub offices: BTreeMap<String, Office>,
}

/// A forecast office entry from the area catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    /// Display name, e.g. "東京都"
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// An area that can be selected in the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaEntry {
    pub code: String,
    pub name: String,
}

impl AreaCatalog {
    /// Flattens the catalog into selectable entries, ordered by area code
    pub fn entries(&self) -> Vec<AreaEntry> {
        self.offices
            .iter()
            .map(|(code, office)| AreaEntry {
                code: code.clone(),
                name: office.name.clone(),
            })
            .collect()
    }

    /// Looks up the display name for an area code
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.offices.get(code).map(|office| office.name.as_str())
    }
}

/// One report in a forecast response
///
/// The forecast endpoint returns an array of these; the first one carries the
/// short-range forecast with day-level weather text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    #[serde(default)]
    pub publishing_office: Option<String>,
    #[serde(default)]
    pub report_datetime: Option<String>,
    #[serde(default)]
    pub time_series: Vec<TimeSeries>,
}

/// A group of area forecasts sharing one set of date labels
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    #[serde(default)]
    pub time_defines: Vec<String>,
    #[serde(default)]
    pub areas: Vec<AreaForecast>,
}

/// Forecast values for one sub-area, aligned by index with `time_defines`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaForecast {
    pub area: Area,
    #[serde(default)]
    pub weathers: Option<Vec<String>>,
    #[serde(default)]
    pub weather_codes: Option<Vec<String>>,
    #[serde(default)]
    pub winds: Option<Vec<String>>,
    #[serde(default)]
    pub waves: Option<Vec<String>>,
}

impl AreaForecast {
    /// Weather texts, empty when the series carries none
    pub fn weathers(&self) -> &[String] {
        self.weathers.as_deref().unwrap_or_default()
    }

    /// Whether this area has at least one weather text
    pub fn has_weathers(&self) -> bool {
        !self.weathers().is_empty()
    }
}

/// Area descriptor inside a forecast payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Area {
    pub name: String,
    pub code: String,
}

/// A normalized forecast row for one day
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedForecastEntry {
    /// Calendar date, the first 10 characters of the time label
    pub date: String,
    /// Full time label as published
    pub time_define: String,
    /// Weather text exactly as published
    pub raw_weather: String,
    /// Weather text after normalization
    pub weather: String,
    pub icon: WeatherIcon,
    pub wind: Option<String>,
    pub wave: Option<String>,
}
