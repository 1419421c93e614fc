//! Application configuration
//!
//! Settings are read from a TOML file (an explicit `--config` path, or
//! `config.toml` in the platform config directory when present) and fall back
//! to defaults for anything missing. Command-line flags are applied on top by
//! the caller.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::data::jma::AREA_CODE_PLACEHOLDER;

const APP_NAME: &str = "tenki";
const CONFIG_FILE: &str = "config.toml";

/// Error types for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for `Config`
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A value is present but unusable
    #[error("Invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub jma: JmaConfig,
    pub cache: CacheConfig,
    pub scraper: ScraperConfig,
}

/// JMA endpoints and HTTP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JmaConfig {
    /// Area catalog URL
    pub area_url: String,
    /// Forecast URL template; `{code}` is replaced by the area code
    pub forecast_url: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for JmaConfig {
    fn default() -> Self {
        Self {
            area_url: "https://www.jma.go.jp/bosai/common/const/area.json".to_string(),
            forecast_url: "https://www.jma.go.jp/bosai/forecast/data/forecast/{code}.json"
                .to_string(),
            timeout_secs: 10,
        }
    }
}

/// Local storage for forecasts and the area catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Store fetched forecasts in SQLite and display them from there
    pub enabled: bool,
    /// SQLite file for cached forecasts; defaults to the data directory
    pub db_path: Option<PathBuf>,
    /// Directory for the area catalog cache; defaults to the cache directory
    pub catalog_dir: Option<PathBuf>,
    /// How long a cached area catalog is considered fresh
    pub catalog_ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            db_path: None,
            catalog_dir: None,
            catalog_ttl_hours: 24,
        }
    }
}

/// Sightseeing-spot scraper settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root joined to relative `/wiki/...` links
    pub base_url: String,
    /// List page the article links are collected from
    pub start_page: String,
    pub user_agent: String,
    /// Delay between article requests in milliseconds
    pub sleep_ms: u64,
    /// Maximum number of articles scraped per run
    pub link_limit: usize,
    /// SQLite file for spot statistics; defaults to the data directory
    pub db_path: Option<PathBuf>,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ja.wikipedia.org".to_string(),
            start_page: "https://ja.wikipedia.org/wiki/日本の観光地一覧".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            sleep_ms: 1000,
            link_limit: 30,
            db_path: None,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Loads configuration
    ///
    /// An explicit path must exist. Without one, `config.toml` in the platform
    /// config directory is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Checks values that would otherwise fail much later
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jma.area_url.trim().is_empty() {
            return Err(invalid("jma.area_url", "must not be empty"));
        }
        if !self.jma.forecast_url.contains(AREA_CODE_PLACEHOLDER) {
            return Err(invalid(
                "jma.forecast_url",
                format!("must contain {}", AREA_CODE_PLACEHOLDER),
            ));
        }
        if self.scraper.start_page.trim().is_empty() {
            return Err(invalid("scraper.start_page", "must not be empty"));
        }
        if self.scraper.link_limit == 0 {
            return Err(invalid("scraper.link_limit", "must be at least 1"));
        }
        Ok(())
    }

    /// SQLite file for cached forecasts
    pub fn forecast_db_path(&self) -> PathBuf {
        self.cache
            .db_path
            .clone()
            .unwrap_or_else(|| data_dir().join("weather.db"))
    }

    /// SQLite file for scraped spot statistics
    pub fn spot_db_path(&self) -> PathBuf {
        self.scraper
            .db_path
            .clone()
            .unwrap_or_else(|| data_dir().join("travel.db"))
    }

    /// Directory for the area catalog cache, if one can be determined
    pub fn catalog_dir(&self) -> Option<PathBuf> {
        self.cache.catalog_dir.clone().or_else(cache_dir)
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Path of the default config file (`~/.config/tenki/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Platform cache directory (`~/.cache/tenki/` on Linux)
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Platform data directory, or the working directory when none exists
fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
