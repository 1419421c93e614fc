//! JMA forecast API client
//!
//! This module fetches the public area catalog and per-area forecast JSON
//! published by the Japan Meteorological Agency.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::{AreaCatalog, ForecastReport};
use crate::config::JmaConfig;

/// Placeholder in the forecast URL template replaced by the area code
pub const AREA_CODE_PLACEHOLDER: &str = "{code}";

/// Errors that can occur when fetching JMA data
#[derive(Debug, Error)]
pub enum JmaError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// JSON parsed but did not have the expected shape
    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),
}

impl JmaError {
    /// Whether the failure happened on the network rather than in the payload
    pub fn is_network(&self) -> bool {
        matches!(self, JmaError::RequestFailed(_) | JmaError::HttpStatus { .. })
    }
}

/// Client for the JMA area catalog and forecast endpoints
#[derive(Debug, Clone)]
pub struct JmaClient {
    client: Client,
    area_url: String,
    forecast_url: String,
}

impl JmaClient {
    /// Create a new JmaClient from configuration
    pub fn new(config: &JmaConfig) -> Result<Self, JmaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a new JmaClient with a custom HTTP client
    pub fn with_client(client: Client, config: &JmaConfig) -> Self {
        Self {
            client,
            area_url: config.area_url.clone(),
            forecast_url: config.forecast_url.clone(),
        }
    }

    /// Forecast URL for the given area code
    pub fn forecast_url(&self, area_code: &str) -> String {
        self.forecast_url.replace(AREA_CODE_PLACEHOLDER, area_code)
    }

    /// Fetch the area catalog
    ///
    /// # Returns
    /// * `Ok(AreaCatalog)` - The `offices` mapping keyed by area code
    /// * `Err(JmaError)` - If the request or parsing fails
    pub async fn fetch_area_catalog(&self) -> Result<AreaCatalog, JmaError> {
        let text = self.get_text(&self.area_url).await?;
        let catalog: AreaCatalog = serde_json::from_str(&text)?;
        debug!(offices = catalog.offices.len(), "parsed area catalog");
        Ok(catalog)
    }

    /// Fetch the forecast reports for one area
    ///
    /// # Arguments
    /// * `area_code` - Office code from the area catalog, e.g. "130000"
    ///
    /// # Returns
    /// * `Ok(Vec<ForecastReport>)` - At least one report
    /// * `Err(JmaError)` - If the request fails or the payload is unusable
    pub async fn fetch_forecast(&self, area_code: &str) -> Result<Vec<ForecastReport>, JmaError> {
        let url = self.forecast_url(area_code);
        let text = self.get_text(&url).await?;
        parse_forecast(&text)
    }

    async fn get_text(&self, url: &str) -> Result<String, JmaError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JmaError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Parse a forecast response body into its reports
fn parse_forecast(text: &str) -> Result<Vec<ForecastReport>, JmaError> {
    let reports: Vec<ForecastReport> = serde_json::from_str(text)?;
    if reports.is_empty() {
        return Err(JmaError::UnexpectedPayload(
            "forecast response contains no reports".to_string(),
        ));
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::resolve;

    /// Trimmed-down forecast for Kushiro/Nemuro with a sea area listed first
    const KUSHIRO_RESPONSE: &str = r#"[
        {
            "publishingOffice": "釧路地方気象台",
            "reportDatetime": "2024-07-15T17:00:00+09:00",
            "timeSeries": [
                {
                    "timeDefines": [
                        "2024-07-15T17:00:00+09:00",
                        "2024-07-16T00:00:00+09:00",
                        "2024-07-17T00:00:00+09:00"
                    ],
                    "areas": [
                        {
                            "area": {"name": "釧路地方海上", "code": "014110"},
                            "waves": ["１．５メートル", "１メートル", "１メートル"]
                        },
                        {
                            "area": {"name": "釧路地方", "code": "014020"},
                            "weatherCodes": ["200", "101", "300"],
                            "weathers": ["くもり　時々　晴れ", "晴れ　後　くもり", "雨"],
                            "winds": ["南の風", "南の風　後　北の風", "北の風"]
                        }
                    ]
                },
                {
                    "timeDefines": ["2024-07-15T18:00:00+09:00"],
                    "areas": [{"area": {"name": "釧路地方", "code": "014020"}, "pops": ["10"]}]
                }
            ]
        },
        {
            "publishingOffice": "釧路地方気象台",
            "reportDatetime": "2024-07-15T17:00:00+09:00",
            "timeSeries": []
        }
    ]"#;

    #[test]
    fn test_parse_forecast_response() {
        let reports = parse_forecast(KUSHIRO_RESPONSE).expect("Failed to parse forecast");

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].time_series.len(), 2);
        assert_eq!(reports[0].time_series[0].areas[1].weathers().len(), 3);
    }

    #[test]
    fn test_parse_forecast_then_resolve() {
        let reports = parse_forecast(KUSHIRO_RESPONSE).expect("Failed to parse forecast");

        let resolved = resolve(&reports, 3).expect("Should resolve");

        assert_eq!(resolved.area_name, "釧路地方");
        assert_eq!(resolved.entries.len(), 3);
        assert_eq!(resolved.entries[0].weather, "くもり、時々晴れ");
        assert_eq!(resolved.entries[1].weather, "晴れのちくもり");
        assert_eq!(resolved.entries[1].wind.as_deref(), Some("南の風　後　北の風"));
    }

    #[test]
    fn test_parse_forecast_empty_array_is_unexpected_payload() {
        let result = parse_forecast("[]");

        assert!(matches!(result, Err(JmaError::UnexpectedPayload(_))));
    }

    #[test]
    fn test_parse_forecast_wrong_shape_is_parse_error() {
        let result = parse_forecast(r#"{"timeSeries": []}"#);

        let err = result.unwrap_err();
        assert!(matches!(err, JmaError::ParseError(_)));
        assert!(!err.is_network());
    }

    #[test]
    fn test_forecast_url_substitutes_area_code() {
        let client = JmaClient::new(&JmaConfig::default()).expect("client should build");

        assert_eq!(
            client.forecast_url("130000"),
            "https://www.jma.go.jp/bosai/forecast/data/forecast/130000.json"
        );
    }

    #[test]
    fn test_http_status_is_network_error() {
        let err = JmaError::HttpStatus {
            status: 404,
            url: "https://example.invalid".to_string(),
        };

        assert!(err.is_network());
        assert!(err.to_string().contains("404"));
    }
}
