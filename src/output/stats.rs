//! Crawl statistics
//!
//! Tallies of how crawl tasks ended. They are logged when the crawl finishes and
//! included in the markdown export; the stdout report lists visited pages only.

use crate::state::TaskOutcome;
use std::sync::atomic::{AtomicU64, Ordering};

/// Crawl statistics summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Tasks that reached a terminal outcome
    pub tasks: u64,

    /// Pages handed to the fetcher
    pub pages_fetched: u64,

    /// Pages whose links were followed
    pub pages_expanded: u64,

    /// Links to pages that were already registered
    pub repeat_visits: u64,

    /// Links to other hosts, discovered but never crawled
    pub off_host: u64,

    /// Tasks refused because the page budget was reached
    pub budget_stops: u64,

    /// Tasks dropped because the crawl was cancelled
    pub cancelled: u64,

    /// URLs that failed to parse or normalize
    pub url_errors: u64,

    /// Fetches that failed
    pub fetch_errors: u64,

    /// Pages whose links could not be extracted
    pub extract_errors: u64,
}

impl CrawlStatistics {
    /// Total task-local failures
    pub fn total_errors(&self) -> u64 {
        self.url_errors + self.fetch_errors + self.extract_errors
    }
}

/// Lock-free recorder that crawl tasks report their outcomes to
#[derive(Debug, Default)]
pub struct StatsRecorder {
    tasks: AtomicU64,
    pages_fetched: AtomicU64,
    pages_expanded: AtomicU64,
    repeat_visits: AtomicU64,
    off_host: AtomicU64,
    budget_stops: AtomicU64,
    cancelled: AtomicU64,
    url_errors: AtomicU64,
    fetch_errors: AtomicU64,
    extract_errors: AtomicU64,
}

impl StatsRecorder {
    /// Creates a recorder with every tally at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one terminal task outcome
    pub fn record(&self, outcome: &TaskOutcome) {
        bump(&self.tasks);

        if outcome.attempted_fetch() {
            bump(&self.pages_fetched);
        }

        match outcome {
            TaskOutcome::Cancelled => bump(&self.cancelled),
            TaskOutcome::BudgetExhausted => bump(&self.budget_stops),
            TaskOutcome::OffHost => bump(&self.off_host),
            TaskOutcome::RepeatVisit => bump(&self.repeat_visits),
            TaskOutcome::InvalidUrl { .. } | TaskOutcome::NormalizeFailed(_) => {
                bump(&self.url_errors)
            }
            TaskOutcome::FetchFailed(_) => bump(&self.fetch_errors),
            TaskOutcome::ExtractFailed(_) => bump(&self.extract_errors),
            TaskOutcome::Expanded { .. } => bump(&self.pages_expanded),
        }
    }

    /// Reads the current tallies
    pub fn snapshot(&self) -> CrawlStatistics {
        CrawlStatistics {
            tasks: read(&self.tasks),
            pages_fetched: read(&self.pages_fetched),
            pages_expanded: read(&self.pages_expanded),
            repeat_visits: read(&self.repeat_visits),
            off_host: read(&self.off_host),
            budget_stops: read(&self.budget_stops),
            cancelled: read(&self.cancelled),
            url_errors: read(&self.url_errors),
            fetch_errors: read(&self.fetch_errors),
            extract_errors: read(&self.extract_errors),
        }
    }
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

fn read(counter: &AtomicU64) -> u64 {
    counter.load(Ordering::Relaxed)
}
