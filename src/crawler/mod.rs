//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageFetcher`] seam
//! - HTML link extraction behind the [`LinkExtractor`] seam
//! - The shared visited-page registry
//! - Recursive, bounded-parallel crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod pending;
mod registry;

pub use coordinator::{CrawlSettings, Crawler};
pub use fetcher::{build_http_client, fetch_html, HttpFetcher, PageFetcher};
pub use parser::{extract_links, HtmlLinkExtractor, LinkExtractor};
pub use pending::{PendingGuard, PendingTasks};
pub use registry::VisitedRegistry;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::CensusError;
use url::Url;

/// Builds a crawler that fetches over HTTP and extracts `<a href>` links
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The URL to start from; its host bounds the crawl
///
/// # Returns
///
/// * `Ok(Crawler)` - Ready to [`Crawler::run`]
/// * `Err(CensusError)` - The HTTP client could not be built
pub fn http_crawler(
    config: &Config,
    seed: Url,
) -> Result<Crawler<HttpFetcher, HtmlLinkExtractor>, CensusError> {
    let fetcher = HttpFetcher::new(&config.user_agent, &config.fetch)?;
    Ok(Crawler::new(
        seed,
        CrawlSettings::from(&config.crawler),
        fetcher,
        HtmlLinkExtractor,
    ))
}

/// Runs a complete crawl over HTTP
///
/// Builds the crawler with [`http_crawler`] and runs it to completion.
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished; individual page failures are only logged
/// * `Err(CensusError)` - The HTTP client could not be built
pub async fn crawl(config: &Config, seed: Url) -> Result<CrawlReport, CensusError> {
    let crawler = http_crawler(config, seed)?;
    Ok(crawler.run().await)
}
