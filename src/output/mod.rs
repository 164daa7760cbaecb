//! Output module for crawl reports
//!
//! This module handles:
//! - Ordering the final registry snapshot into a report
//! - Printing the report to stdout
//! - Exporting the report as markdown
//! - Tallying crawl task outcomes

mod markdown;
mod report;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use report::{format_report, order_pages_desc, print_report, CrawlReport, PageCount};
pub use stats::{CrawlStatistics, StatsRecorder};
