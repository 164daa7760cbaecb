//! Markdown report generation
//!
//! This module renders a finished crawl as a markdown document: run
//! information, task outcome statistics, and the ordered page table.

use crate::output::report::CrawlReport;
use crate::CensusError;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report for a finished crawl
///
/// # Arguments
///
/// * `report` - The finished crawl report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the markdown report
/// * `Err(CensusError)` - Failed to write the file
pub fn generate_markdown_report(report: &CrawlReport, output_path: &Path) -> Result<(), CensusError> {
    let markdown = format_markdown_report(report, Utc::now());

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Markdown report written to {}", output_path.display());
    Ok(())
}

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The finished crawl report
/// * `generated_at` - Timestamp written into the run information
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &CrawlReport, generated_at: DateTime<Utc>) -> String {
    let stats = &report.statistics;
    let mut md = String::new();

    md.push_str("# Sumi-Census Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", report.seed));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n\n",
        report.elapsed.as_secs_f64()
    ));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Distinct Pages**: {}\n", report.total_pages()));
    md.push_str(&format!("- **Pages Fetched**: {}\n", stats.pages_fetched));
    md.push_str(&format!("- **Pages Expanded**: {}\n", stats.pages_expanded));
    md.push_str(&format!("- **Total Errors**: {}\n\n", stats.total_errors()));

    md.push_str("## Task Outcomes\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Expanded | {} |\n", stats.pages_expanded));
    md.push_str(&format!("| Repeat Visit | {} |\n", stats.repeat_visits));
    md.push_str(&format!("| Off Host | {} |\n", stats.off_host));
    md.push_str(&format!("| Budget Exhausted | {} |\n", stats.budget_stops));
    md.push_str(&format!("| Cancelled | {} |\n", stats.cancelled));
    md.push_str(&format!("| URL Error | {} |\n", stats.url_errors));
    md.push_str(&format!("| Fetch Error | {} |\n", stats.fetch_errors));
    md.push_str(&format!("| Extract Error | {} |\n\n", stats.extract_errors));

    // Page table
    md.push_str("## Pages by Internal Links\n\n");
    if report.pages.is_empty() {
        md.push_str("No pages were visited.\n");
    } else {
        md.push_str("| Page | Internal Links |\n");
        md.push_str("|------|----------------|\n");
        for page in &report.pages {
            md.push_str(&format!("| {} | {} |\n", page.url, page.count));
        }
    }

    md
}
