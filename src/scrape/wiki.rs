//! Wikipedia list-page scraper

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use super::{html, ScrapeError, SpotStats};
use crate::config::ScraperConfig;
use crate::store::SpotStore;

/// Outcome of scraping one article
#[derive(Debug)]
pub enum ScrapeOutcome {
    /// Article parsed and stored
    Saved {
        url: String,
        record_id: i64,
        stats: SpotStats,
    },
    /// Article skipped, with the reason
    Failed { url: String, reason: String },
}

/// Per-article outcomes of one scraper run, in link order
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub outcomes: Vec<ScrapeOutcome>,
}

impl ScrapeReport {
    pub fn saved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ScrapeOutcome::Saved { .. }))
            .count()
    }

    /// Failed articles as (url, reason) pairs
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            ScrapeOutcome::Failed { url, reason } => Some((url.as_str(), reason.as_str())),
            ScrapeOutcome::Saved { .. } => None,
        })
    }
}

/// Article links from a list page
///
/// Keeps anchors inside list items that point at `/wiki/` pages outside any
/// namespace (no `:`), joined to `base_url`. Duplicates are dropped keeping
/// the first occurrence, then the list is cut to `limit`, so the same page
/// always yields the same links.
pub fn collect_links(page: &str, base_url: &str, limit: usize) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    let mut seen = HashSet::new();

    html::list_item_hrefs(page)
        .into_iter()
        .filter(|href| href.starts_with("/wiki/") && !href.contains(':'))
        .map(|href| format!("{}{}", base, href))
        .filter(|url| seen.insert(url.clone()))
        .take(limit)
        .collect()
}

/// Size statistics for an article page
pub fn parse_spot(page: &str) -> Result<SpotStats, ScrapeError> {
    let title = html::elements(page, "h1")
        .first()
        .map(|inner| html::text_content(inner).trim().to_string())
        .ok_or(ScrapeError::MissingTitle)?;

    let text: String = html::elements(page, "p")
        .into_iter()
        .map(html::text_content)
        .collect();

    Ok(SpotStats {
        title,
        text_length: text.chars().count(),
        section_count: html::count_tags(page, "h2"),
    })
}

/// Scraper for one Wikipedia list page and the articles it links to
#[derive(Debug, Clone)]
pub struct WikiScraper {
    client: Client,
    config: ScraperConfig,
}

impl WikiScraper {
    /// Create a new scraper from configuration
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    /// Links to scrape, taken from the configured start page
    pub async fn spot_links(&self) -> Result<Vec<String>, ScrapeError> {
        let page = self.fetch_page(&self.config.start_page).await?;
        let links = collect_links(&page, &self.config.base_url, self.config.link_limit);
        info!(count = links.len(), "collected spot links");
        Ok(links)
    }

    /// Fetches and parses one article
    pub async fn scrape_spot(&self, url: &str) -> Result<SpotStats, ScrapeError> {
        let page = self.fetch_page(url).await?;
        parse_spot(&page)
    }

    /// Scrapes every linked article and stores the results
    ///
    /// Failing to load the start page is an error; failures on individual
    /// articles are recorded in the report and the run continues. Requests
    /// are spaced by the configured delay.
    pub async fn run(&self, store: &SpotStore) -> Result<ScrapeReport, ScrapeError> {
        let links = self.spot_links().await?;
        let delay = Duration::from_millis(self.config.sleep_ms);
        let mut report = ScrapeReport::default();

        for (i, url) in links.into_iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let result = match self.scrape_spot(&url).await {
                Ok(stats) => store.insert(&stats).map(|id| (id, stats)).map_err(ScrapeError::from),
                Err(e) => Err(e),
            };

            let outcome = match result {
                Ok((record_id, stats)) => {
                    debug!(url, title = %stats.title, "saved spot");
                    ScrapeOutcome::Saved {
                        url,
                        record_id,
                        stats,
                    }
                }
                Err(e) => {
                    warn!(url, error = %e, "skipping spot");
                    ScrapeOutcome::Failed {
                        url,
                        reason: e.to_string(),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        info!(
            saved = report.saved_count(),
            failed = report.outcomes.len() - report.saved_count(),
            "scrape finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_PAGE: &str = r#"
        <html><body>
        <h1>日本の観光地一覧</h1>
        <ul>
          <li><a href="/wiki/%E9%87%91%E9%96%A3%E5%AF%BA">金閣寺</a></li>
          <li><a href="/wiki/Help:%E7%9B%AE%E6%AC%A1">ヘルプ</a></li>
          <li><a href="https://example.com/wiki/External">外部</a></li>
          <li><a href="/wiki/%E5%AF%8C%E5%A3%AB%E5%B1%B1">富士山</a></li>
          <li><a href="/wiki/%E9%87%91%E9%96%A3%E5%AF%BA">金閣寺（再掲）</a></li>
          <li><a href="/w/index.php?title=X">編集</a></li>
          <li><a href="/wiki/%E5%8E%B3%E5%B3%B6%E7%A5%9E%E7%A4%BE">厳島神社</a></li>
        </ul>
        <p><a href="/wiki/NotInList">本文</a></p>
        </body></html>
    "#;

    const ARTICLE: &str = r#"
        <html><body>
        <h1 id="firstHeading" class="firstHeading"><span class="mw-page-title-main">金閣寺</span></h1>
        <p><b>金閣寺</b>は京都にある。</p>
        <h2>概要</h2>
        <p>鹿苑寺&amp;舎利殿</p>
        <h2>歴史</h2>
        <h3>創建</h3>
        </body></html>
    "#;

    #[test]
    fn test_collect_links_filters_and_dedupes_in_order() {
        let links = collect_links(LIST_PAGE, "https://ja.wikipedia.org", 30);

        assert_eq!(
            links,
            vec![
                "https://ja.wikipedia.org/wiki/%E9%87%91%E9%96%A3%E5%AF%BA",
                "https://ja.wikipedia.org/wiki/%E5%AF%8C%E5%A3%AB%E5%B1%B1",
                "https://ja.wikipedia.org/wiki/%E5%8E%B3%E5%B3%B6%E7%A5%9E%E7%A4%BE",
            ]
        );
    }

    #[test]
    fn test_collect_links_truncates_after_dedupe() {
        let links = collect_links(LIST_PAGE, "https://ja.wikipedia.org/", 2);

        assert_eq!(links.len(), 2);
        assert!(links[1].ends_with("%E5%AF%8C%E5%A3%AB%E5%B1%B1"));
    }

    #[test]
    fn test_parse_spot_counts_text_and_sections() {
        let stats = parse_spot(ARTICLE).expect("Should parse article");

        assert_eq!(stats.title, "金閣寺");
        // "金閣寺は京都にある。" (10) + "鹿苑寺&舎利殿" (7)
        assert_eq!(stats.text_length, 17);
        assert_eq!(stats.section_count, 2);
    }

    #[test]
    fn test_parse_spot_without_heading_fails() {
        let result = parse_spot("<p>本文だけ</p>");

        assert!(matches!(result, Err(ScrapeError::MissingTitle)));
    }

    #[test]
    fn test_report_counts() {
        let report = ScrapeReport {
            outcomes: vec![
                ScrapeOutcome::Saved {
                    url: "a".to_string(),
                    record_id: 1,
                    stats: SpotStats {
                        title: "A".to_string(),
                        text_length: 1,
                        section_count: 0,
                    },
                },
                ScrapeOutcome::Failed {
                    url: "b".to_string(),
                    reason: "Server returned HTTP 404".to_string(),
                },
            ],
        };

        assert_eq!(report.saved_count(), 1);
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec![("b", "Server returned HTTP 404")]
        );
    }
}
