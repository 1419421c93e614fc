//! Forecast series resolution and weather text normalization
//!
//! JMA forecast payloads contain several time series per report (weather,
//! precipitation probability, temperatures) and several sub-areas per series,
//! some of which are sea areas. This module picks the series carrying weather
//! text, prefers the land area, and turns the terse forecast phrases into
//! display rows.

use super::{AreaForecast, ForecastReport, NormalizedForecastEntry, TimeSeries};

/// Substring marking a sea-area forecast in an area name
pub const MARITIME_MARKER: &str = "海上";

/// Default number of days shown per area
pub const DEFAULT_DAY_LIMIT: usize = 3;

/// Labels for the first three forecast days
const DAY_LABELS: [&str; 3] = ["今日", "明日", "明後日"];

/// Replacement rules, applied one after another over the whole text
const NORMALIZE_RULES: [(&str, &str); 4] = [
    ("\u{3000}", ""),
    ("時々", "、時々"),
    ("所により", "、所により"),
    ("後", "のち"),
];

/// Icon classes for forecast text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Snow,
    Thunder,
    Rain,
    Cloud,
    Clear,
    Unknown,
}

impl WeatherIcon {
    /// Glyph rendered for this icon class
    pub fn glyph(self) -> &'static str {
        match self {
            WeatherIcon::Snow => "\u{2744}\u{FE0F}",    // ❄️
            WeatherIcon::Thunder => "\u{26C8}",         // ⛈
            WeatherIcon::Rain => "\u{1F327}",           // 🌧
            WeatherIcon::Cloud => "\u{2601}\u{FE0F}",   // ☁️
            WeatherIcon::Clear => "\u{2600}\u{FE0F}",   // ☀️
            WeatherIcon::Unknown => "\u{1F308}",        // 🌈
        }
    }
}

/// Result of resolving a forecast response for display
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedForecast {
    /// Name of the sub-area the entries were taken from
    pub area_name: String,
    pub publishing_office: Option<String>,
    pub report_datetime: Option<String>,
    pub entries: Vec<NormalizedForecastEntry>,
}

/// Finds the first time series that carries weather text
///
/// Returns `None` when no area in any series has a non-empty `weathers`
/// list; callers show that as "no weather data" rather than an error.
pub fn find_weather_series(series: &[TimeSeries]) -> Option<&TimeSeries> {
    series
        .iter()
        .find(|ts| ts.areas.iter().any(AreaForecast::has_weathers))
}

/// Picks the first land area, falling back to the first area
///
/// Returns `None` only for an empty slice.
pub fn select_land_area(areas: &[AreaForecast]) -> Option<&AreaForecast> {
    areas
        .iter()
        .find(|a| !a.area.name.contains(MARITIME_MARKER))
        .or_else(|| areas.first())
}

/// Rewrites forecast text into more readable Japanese
///
/// Each rule runs over the full output of the previous one, so the order of
/// `NORMALIZE_RULES` matters.
pub fn normalize_weather_text(raw: &str) -> String {
    NORMALIZE_RULES
        .iter()
        .fold(raw.to_string(), |text, (from, to)| text.replace(from, to))
}

/// Classifies forecast text into an icon
///
/// Snow wins over thunder, thunder over rain, rain over cloud, cloud over
/// clear. Text such as "雨のち雪" therefore shows snow.
pub fn weather_icon(raw: &str) -> WeatherIcon {
    if raw.contains('雪') {
        WeatherIcon::Snow
    } else if raw.contains('雷') {
        WeatherIcon::Thunder
    } else if raw.contains('雨') {
        WeatherIcon::Rain
    } else if raw.contains("くもり") || raw.contains('曇') {
        WeatherIcon::Cloud
    } else if raw.contains('晴') {
        WeatherIcon::Clear
    } else {
        WeatherIcon::Unknown
    }
}

/// Pairs date labels with weather texts for up to `limit` days
pub fn build_entries(
    series: &TimeSeries,
    area: &AreaForecast,
    limit: usize,
) -> Vec<NormalizedForecastEntry> {
    let at = |values: &Option<Vec<String>>, i: usize| {
        values.as_ref().and_then(|v| v.get(i)).cloned()
    };

    series
        .time_defines
        .iter()
        .zip(area.weathers())
        .take(limit)
        .enumerate()
        .map(|(i, (time_define, raw))| NormalizedForecastEntry {
            date: time_define.chars().take(10).collect(),
            time_define: time_define.clone(),
            raw_weather: raw.clone(),
            weather: normalize_weather_text(raw),
            icon: weather_icon(raw),
            wind: at(&area.winds, i),
            wave: at(&area.waves, i),
        })
        .collect()
}

/// Resolves the first report of a forecast response into display entries
///
/// Only areas that carry weather text take part in the land-area choice.
pub fn resolve(reports: &[ForecastReport], limit: usize) -> Option<ResolvedForecast> {
    let report = reports.first()?;
    let series = find_weather_series(&report.time_series)?;

    let candidates: Vec<AreaForecast> = series
        .areas
        .iter()
        .filter(|a| a.has_weathers())
        .cloned()
        .collect();
    let area = select_land_area(&candidates)?;

    Some(ResolvedForecast {
        area_name: area.area.name.clone(),
        publishing_office: report.publishing_office.clone(),
        report_datetime: report.report_datetime.clone(),
        entries: build_entries(series, area, limit),
    })
}

/// Label for the day at `index`, or `None` past the day after tomorrow
pub fn day_label(index: usize) -> Option<&'static str> {
    DAY_LABELS.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Area;

    fn area(name: &str, weathers: Option<&[&str]>) -> AreaForecast {
        AreaForecast {
            area: Area {
                name: name.to_string(),
                code: format!("code-{}", name),
            },
            weathers: weathers.map(|w| w.iter().map(|s| s.to_string()).collect()),
            weather_codes: None,
            winds: None,
            waves: None,
        }
    }

    fn series(time_defines: &[&str], areas: Vec<AreaForecast>) -> TimeSeries {
        TimeSeries {
            time_defines: time_defines.iter().map(|s| s.to_string()).collect(),
            areas,
        }
    }

    #[test]
    fn test_find_weather_series_skips_series_without_weathers() {
        let pops = series(&["2024-07-15T00:00:00+09:00"], vec![area("東京", None)]);
        let weather = series(
            &["2024-07-15T17:00:00+09:00"],
            vec![area("東京地方", Some(&["晴れ"]))],
        );
        let list = vec![pops, weather.clone()];

        assert_eq!(find_weather_series(&list), Some(&weather));
    }

    #[test]
    fn test_find_weather_series_not_found() {
        let list = vec![
            series(&["a"], vec![area("東京", None)]),
            series(&["b"], vec![area("大島", Some(&[]))]),
            series(&["c"], vec![]),
        ];

        assert!(find_weather_series(&list).is_none());
        assert!(find_weather_series(&[]).is_none());
    }

    #[test]
    fn test_find_weather_series_returns_first_match() {
        let first = series(&["first"], vec![area("A", None), area("B", Some(&["雨"]))]);
        let second = series(&["second"], vec![area("C", Some(&["晴れ"]))]);
        let list = vec![first.clone(), second];

        assert_eq!(find_weather_series(&list), Some(&first));
    }

    #[test]
    fn test_select_land_area_skips_maritime() {
        let areas = vec![
            area("釧路地方海上", Some(&["くもり"])),
            area("釧路地方", Some(&["晴れ"])),
            area("根室地方", Some(&["雨"])),
        ];

        let chosen = select_land_area(&areas).expect("should choose an area");

        assert_eq!(chosen.area.name, "釧路地方");
    }

    #[test]
    fn test_select_land_area_falls_back_to_first() {
        let areas = vec![
            area("東部海上", Some(&["晴れ"])),
            area("西部海上", Some(&["雨"])),
        ];

        let chosen = select_land_area(&areas).expect("should fall back");

        assert_eq!(chosen.area.name, "東部海上");
    }

    #[test]
    fn test_select_land_area_empty() {
        assert!(select_land_area(&[]).is_none());
    }

    #[test]
    fn test_normalize_weather_text_example() {
        assert_eq!(normalize_weather_text("晴れ　時々　曇り"), "晴れ、時々曇り");
    }

    #[test]
    fn test_normalize_weather_text_all_rules() {
        assert_eq!(
            normalize_weather_text("くもり　後　晴れ　所により　雨"),
            "くもりのち晴れ、所により雨"
        );
        assert_eq!(normalize_weather_text("雨後晴れ後くもり"), "雨のち晴れのちくもり");
    }

    #[test]
    fn test_normalize_weather_text_is_sequential() {
        // Removing the full-width space first is what lets "時々" match here.
        assert_eq!(normalize_weather_text("晴れ時　々"), "晴れ、時々");
    }

    #[test]
    fn test_normalize_weather_text_leaves_plain_text() {
        assert_eq!(normalize_weather_text("晴れ"), "晴れ");
        assert_eq!(normalize_weather_text(""), "");
    }

    #[test]
    fn test_weather_icon_priority() {
        assert_eq!(weather_icon("雨のち雪"), WeatherIcon::Snow);
        assert_eq!(weather_icon("雨のち雪").glyph(), "\u{2744}\u{FE0F}");
        assert_eq!(weather_icon("雷雨"), WeatherIcon::Thunder);
        assert_eq!(weather_icon("雷雨").glyph(), "\u{26C8}");
        assert_eq!(weather_icon("くもり時々雨"), WeatherIcon::Rain);
        assert_eq!(weather_icon("晴れ時々くもり"), WeatherIcon::Cloud);
        assert_eq!(weather_icon("曇り"), WeatherIcon::Cloud);
        assert_eq!(weather_icon("晴れ"), WeatherIcon::Clear);
        assert_eq!(weather_icon("霧"), WeatherIcon::Unknown);
        assert_eq!(weather_icon("").glyph(), "\u{1F308}");
    }

    #[test]
    fn test_build_entries_bounded_by_weathers() {
        let s = series(
            &[
                "2024-07-15T17:00:00+09:00",
                "2024-07-16T00:00:00+09:00",
                "2024-07-17T00:00:00+09:00",
                "2024-07-18T00:00:00+09:00",
                "2024-07-19T00:00:00+09:00",
            ],
            vec![],
        );
        let a = area("東京地方", Some(&["晴れ", "くもり"]));

        let entries = build_entries(&s, &a, DEFAULT_DAY_LIMIT);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, "2024-07-15");
        assert_eq!(entries[0].time_define, "2024-07-15T17:00:00+09:00");
        assert_eq!(entries[1].date, "2024-07-16");
    }

    #[test]
    fn test_build_entries_bounded_by_limit() {
        let s = series(&["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"], vec![]);
        let a = area("東京地方", Some(&["晴れ", "雨", "雪", "くもり"]));

        let entries = build_entries(&s, &a, 3);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].icon, WeatherIcon::Snow);
    }

    #[test]
    fn test_build_entries_bounded_by_time_defines() {
        let s = series(&["2024-01-01T00:00:00+09:00"], vec![]);
        let a = area("東京地方", Some(&["晴れ", "雨", "雪"]));

        assert_eq!(build_entries(&s, &a, 3).len(), 1);
    }

    #[test]
    fn test_build_entries_normalizes_and_keeps_raw() {
        let s = series(&["2024-01-01T17:00:00+09:00"], vec![]);
        let mut a = area("東京地方", Some(&["くもり　後　雨"]));
        a.winds = Some(vec!["北の風".to_string()]);

        let entries = build_entries(&s, &a, 3);

        assert_eq!(entries[0].raw_weather, "くもり　後　雨");
        assert_eq!(entries[0].weather, "くもりのち雨");
        assert_eq!(entries[0].icon, WeatherIcon::Rain);
        assert_eq!(entries[0].wind.as_deref(), Some("北の風"));
        assert!(entries[0].wave.is_none());
    }

    #[test]
    fn test_resolve_prefers_land_area_with_weathers() {
        let report = ForecastReport {
            publishing_office: Some("釧路地方気象台".to_string()),
            report_datetime: Some("2024-07-15T17:00:00+09:00".to_string()),
            time_series: vec![series(
                &["2024-07-15T17:00:00+09:00", "2024-07-16T00:00:00+09:00"],
                vec![
                    area("釧路地方", None),
                    area("釧路地方海上", Some(&["くもり", "晴れ"])),
                    area("根室地方", Some(&["雨", "くもり"])),
                ],
            )],
        };

        let resolved = resolve(&[report], 3).expect("should resolve");

        assert_eq!(resolved.area_name, "根室地方");
        assert_eq!(resolved.publishing_office.as_deref(), Some("釧路地方気象台"));
        assert_eq!(resolved.entries.len(), 2);
        assert_eq!(resolved.entries[0].weather, "雨");
    }

    #[test]
    fn test_resolve_without_reports_or_weathers() {
        assert!(resolve(&[], 3).is_none());

        let report = ForecastReport {
            publishing_office: None,
            report_datetime: None,
            time_series: vec![series(&["a"], vec![area("東京", None)])],
        };
        assert!(resolve(&[report], 3).is_none());
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label(0), Some("今日"));
        assert_eq!(day_label(1), Some("明日"));
        assert_eq!(day_label(2), Some("明後日"));
        assert_eq!(day_label(3), None);
    }
}
