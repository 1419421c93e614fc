//! Sightseeing-spot scraper
//!
//! Collects article links from a Wikipedia list page, records simple size
//! statistics for each article and reports a per-article outcome.

pub mod html;
mod wiki;

pub use wiki::{collect_links, parse_spot, ScrapeOutcome, ScrapeReport, WikiScraper};

use thiserror::Error;

/// Size statistics for one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotStats {
    /// Text of the page's first `<h1>`
    pub title: String,
    /// Characters across all paragraphs
    pub text_length: usize,
    /// Number of `<h2>` sections
    pub section_count: usize,
}

/// Errors that can occur while scraping a page
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned HTTP {0}")]
    HttpStatus(u16),

    /// The page has no usable `<h1>` title
    #[error("Page has no title heading")]
    MissingTitle,

    /// Saving the result failed
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),
}
