//! Command-line interface parsing for tenki
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a [`StartupConfig`] that picks the run mode and overrides values from
//! the configuration file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::Config;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// Area codes are six ASCII digits, e.g. 130000
    #[error("Invalid area code: '{0}'. Expected six digits, e.g. 130000")]
    InvalidAreaCode(String),

    /// `--limit 0` would scrape nothing
    #[error("Invalid link limit: must be at least 1")]
    ZeroLimit,
}

/// tenki - JMA forecast browser and sightseeing-spot scraper
#[derive(Parser, Debug)]
#[command(name = "tenki")]
#[command(about = "Japanese weather forecasts in the terminal, plus a sightseeing-spot scraper")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to config.toml in the user config dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Store fetched forecasts in SQLite and show them from there
    #[arg(long, global = true)]
    pub cache: bool,

    /// Database file: spots for `scrape` and `stats`, forecasts otherwise
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive forecast browser (default)
    Ui,
    /// List area codes and names
    Areas,
    /// Print the forecast for one area
    Forecast {
        /// Area code, e.g. 130000
        code: String,
    },
    /// Print the cached forecast rows for one area
    History {
        /// Area code, e.g. 130000
        code: String,
    },
    /// Scrape sightseeing spots from Wikipedia into SQLite
    Scrape {
        /// Maximum number of articles to scrape
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
        /// Delay between requests in milliseconds
        #[arg(long, value_name = "MS")]
        sleep_ms: Option<u64>,
    },
    /// Summarize scraped spots
    Stats {
        /// Draw a scatter chart of text length against section count
        #[arg(long)]
        plot: bool,
    },
}

/// What the binary does after startup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browse,
    Areas,
    Forecast(String),
    History(String),
    Scrape,
    Stats { plot: bool },
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub mode: Mode,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
    /// Enable the SQLite forecast cache
    pub cache: bool,
    pub forecast_db: Option<PathBuf>,
    pub spot_db: Option<PathBuf>,
    pub link_limit: Option<usize>,
    pub sleep_ms: Option<u64>,
}

/// Checks an area code argument.
///
/// # Returns
/// * `Ok(String)` with the code if it is six ASCII digits
/// * `Err(CliError::InvalidAreaCode)` otherwise
pub fn parse_area_code(s: &str) -> Result<String, CliError> {
    let code = s.trim();
    if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(code.to_string())
    } else {
        Err(CliError::InvalidAreaCode(s.to_string()))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an area code or limit is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut startup = StartupConfig {
            config_path: cli.config.clone(),
            cache: cli.cache,
            ..StartupConfig::default()
        };

        startup.mode = match &cli.command {
            None | Some(Command::Ui) => Mode::Browse,
            Some(Command::Areas) => Mode::Areas,
            Some(Command::Forecast { code }) => Mode::Forecast(parse_area_code(code)?),
            Some(Command::History { code }) => Mode::History(parse_area_code(code)?),
            Some(Command::Scrape { limit, sleep_ms }) => {
                if *limit == Some(0) {
                    return Err(CliError::ZeroLimit);
                }
                startup.link_limit = *limit;
                startup.sleep_ms = *sleep_ms;
                Mode::Scrape
            }
            Some(Command::Stats { plot }) => Mode::Stats { plot: *plot },
        };

        match startup.mode {
            Mode::Scrape | Mode::Stats { .. } => startup.spot_db = cli.db.clone(),
            _ => startup.forecast_db = cli.db.clone(),
        }

        Ok(startup)
    }

    /// Overrides configuration values with the ones given on the command line
    pub fn apply_to(&self, config: &mut Config) {
        if self.cache {
            config.cache.enabled = true;
        }
        if let Some(path) = &self.forecast_db {
            config.cache.db_path = Some(path.clone());
        }
        if let Some(path) = &self.spot_db {
            config.scraper.db_path = Some(path.clone());
        }
        if let Some(limit) = self.link_limit {
            config.scraper.link_limit = limit;
        }
        if let Some(sleep_ms) = self.sleep_ms {
            config.scraper.sleep_ms = sleep_ms;
        }
    }

    /// Whether this run takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.mode, Mode::Browse | Mode::Stats { plot: true })
    }
}
