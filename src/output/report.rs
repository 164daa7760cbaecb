//! Final crawl report
//!
//! The report is built once, after every crawl task has finished, from a
//! snapshot of the visited registry.

use crate::output::stats::CrawlStatistics;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::Duration;

/// One distinct page and the number of references to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCount {
    /// Normalized page key
    pub url: String,

    /// How many times the page was reached, including the seed visit
    pub count: u32,
}

/// Ordered result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed URL the crawl started from
    pub seed: String,

    /// Visited pages, most referenced first
    pub pages: Vec<PageCount>,

    /// Task outcome tallies
    pub statistics: CrawlStatistics,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Builds a report from a registry snapshot
    pub fn new(
        seed: impl Into<String>,
        snapshot: HashMap<String, u32>,
        statistics: CrawlStatistics,
        elapsed: Duration,
    ) -> Self {
        Self {
            seed: seed.into(),
            pages: order_pages_desc(snapshot),
            statistics,
            elapsed,
        }
    }

    /// Reference count for a normalized page key
    pub fn count_for(&self, url: &str) -> Option<u32> {
        self.pages.iter().find(|p| p.url == url).map(|p| p.count)
    }

    /// Number of distinct pages visited
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }
}

/// Orders pages by count descending, breaking ties by key ascending
pub fn order_pages_desc(pages: HashMap<String, u32>) -> Vec<PageCount> {
    let mut ordered: Vec<PageCount> = pages
        .into_iter()
        .map(|(url, count)| PageCount { url, count })
        .collect();

    ordered.sort_by(|a, b| {
        Reverse(a.count)
            .cmp(&Reverse(b.count))
            .then_with(|| a.url.cmp(&b.url))
    });

    ordered
}

/// Formats a report for the terminal
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=============================\n");
    out.push_str(&format!("REPORT for {}\n", report.seed));
    out.push_str("=============================\n");

    for page in &report.pages {
        out.push_str(&format!(
            "Found {} internal links to {}\n",
            page.count, page.url
        ));
    }

    out
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    println!();
    print!("{}", format_report(report));
}
