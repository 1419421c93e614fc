//! tenki library
//!
//! JMA forecast fetching and resolution, the SQLite stores, the Wikipedia
//! spot scraper and the terminal UI. The binary in `main.rs` wires these
//! together; integration tests use them directly.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod scrape;
pub mod service;
pub mod stats;
pub mod store;
pub mod ui;
