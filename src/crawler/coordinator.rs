//! Crawler coordinator - recursive crawl orchestration
//!
//! Every discovered URL becomes its own tokio task. A task walks:
//!
//! 1. Admit: take a permit from the admission gate (held until the task ends)
//! 2. Budget check: stop if the registry already holds `max_pages` keys
//! 3. Parse and host filter: stop on parse errors or other hosts
//! 4. Normalize
//! 5. Register: stop unless this is the page's first visit
//! 6. Fetch
//! 7. Extract links, resolved against the seed URL
//! 8. Spawn one child task per extracted link
//!
//! The budget check is a read, not a reservation. With more than one permit,
//! several tasks can pass the check before any of them registers, so the crawl
//! may visit a few pages past `max_pages`. With a single permit the check and
//! the registration are serialized and the budget is exact.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::LinkExtractor;
use crate::crawler::pending::PendingTasks;
use crate::crawler::registry::VisitedRegistry;
use crate::output::{CrawlReport, StatsRecorder};
use crate::state::TaskOutcome;
use crate::url::{is_same_host, normalize_url};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use url::Url;

/// Limits applied to a single crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Capacity of the admission gate
    pub max_concurrency: usize,

    /// Distinct pages to register before refusing new work
    pub max_pages: usize,
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency,
            max_pages: config.max_pages,
        }
    }
}

/// State shared by every task of one crawl
struct CrawlContext<F, E> {
    seed: Url,
    settings: CrawlSettings,
    fetcher: F,
    extractor: E,
    registry: VisitedRegistry,
    gate: Arc<Semaphore>,
    pending: Arc<PendingTasks>,
    stats: StatsRecorder,
    cancelled: AtomicBool,
}

/// Same-host crawler
///
/// Cloning is cheap and every clone drives the same crawl, which lets a signal
/// handler hold a clone to call [`Crawler::cancel`].
pub struct Crawler<F, E> {
    ctx: Arc<CrawlContext<F, E>>,
}

impl<F, E> Clone for Crawler<F, E> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
        }
    }
}

impl<F: PageFetcher, E: LinkExtractor> Crawler<F, E> {
    /// Creates a crawler for `seed`
    ///
    /// A `max_concurrency` of zero is raised to one so the gate can admit work.
    pub fn new(seed: Url, settings: CrawlSettings, fetcher: F, extractor: E) -> Self {
        let permits = settings.max_concurrency.max(1);

        Self {
            ctx: Arc::new(CrawlContext {
                seed,
                settings,
                fetcher,
                extractor,
                registry: VisitedRegistry::new(),
                gate: Arc::new(Semaphore::new(permits)),
                pending: PendingTasks::new(),
                stats: StatsRecorder::new(),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// The seed URL this crawl starts from
    pub fn seed(&self) -> &Url {
        &self.ctx.seed
    }

    /// The registry of visited pages
    pub fn registry(&self) -> &VisitedRegistry {
        &self.ctx.registry
    }

    /// Stops admitting new work
    ///
    /// Tasks already past admission run to completion; queued and future tasks
    /// end as [`TaskOutcome::Cancelled`].
    pub fn cancel(&self) {
        self.ctx.cancelled.store(true, Ordering::SeqCst);
        self.ctx.gate.close();
    }

    /// Returns true once [`Crawler::cancel`] has been called
    pub fn is_cancelled(&self) -> bool {
        self.ctx.is_cancelled()
    }

    /// Runs the crawl to completion and builds the report
    ///
    /// Returns once every spawned task, including tasks spawned by tasks, has
    /// finished.
    pub async fn run(&self) -> CrawlReport {
        let start_time = Instant::now();
        let seed = self.ctx.seed.to_string();

        tracing::info!(
            "Starting crawl of {} (concurrency: {}, max pages: {})",
            seed,
            self.ctx.settings.max_concurrency,
            self.ctx.settings.max_pages
        );

        spawn_task(Arc::clone(&self.ctx), seed.clone());
        self.ctx.pending.wait_idle().await;

        let statistics = self.ctx.stats.snapshot();
        let elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl completed: {} pages visited, {} fetched, {} errors in {:?}",
            self.ctx.registry.size(),
            statistics.pages_fetched,
            statistics.total_errors(),
            elapsed
        );

        CrawlReport::new(seed, self.ctx.registry.snapshot(), statistics, elapsed)
    }
}

/// Spawns a crawl task for `raw_url`, counted until it finishes
fn spawn_task<F: PageFetcher, E: LinkExtractor>(ctx: Arc<CrawlContext<F, E>>, raw_url: String) {
    let guard = ctx.pending.add();

    tokio::spawn(async move {
        let _guard = guard;
        let outcome = ctx.crawl_page(&raw_url).await;
        ctx.record(&raw_url, &outcome);
    });
}

impl<F: PageFetcher, E: LinkExtractor> CrawlContext<F, E> {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Runs one crawl task and reports how it ended
    async fn crawl_page(self: &Arc<Self>, raw_url: &str) -> TaskOutcome {
        if self.is_cancelled() {
            return TaskOutcome::Cancelled;
        }

        // Admit. The permit is released when it drops, on every return below.
        let _permit = match Arc::clone(&self.gate).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return TaskOutcome::Cancelled,
        };

        if self.is_cancelled() {
            return TaskOutcome::Cancelled;
        }

        if self.registry.size() >= self.settings.max_pages {
            return TaskOutcome::BudgetExhausted;
        }

        let current_url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(e) => {
                return TaskOutcome::InvalidUrl {
                    message: e.to_string(),
                }
            }
        };

        if !is_same_host(&current_url, &self.seed) {
            return TaskOutcome::OffHost;
        }

        let key = match normalize_url(current_url.as_str()) {
            Ok(key) => key,
            Err(e) => return TaskOutcome::NormalizeFailed(e),
        };

        if !self.registry.register_visit(&key) {
            return TaskOutcome::RepeatVisit;
        }

        tracing::info!("Crawling {}", current_url);

        let html = match self.fetcher.fetch(current_url.as_str()).await {
            Ok(html) => html,
            Err(e) => return TaskOutcome::FetchFailed(e),
        };

        let links = match self.extractor.extract_links(&html, self.seed.as_str()) {
            Ok(links) => links,
            Err(e) => return TaskOutcome::ExtractFailed(e),
        };

        let children = links.len();
        for link in links {
            spawn_task(Arc::clone(self), link);
        }

        TaskOutcome::Expanded { children }
    }

    /// Logs and tallies a finished task
    fn record(&self, raw_url: &str, outcome: &TaskOutcome) {
        self.stats.record(outcome);

        match outcome {
            TaskOutcome::OffHost | TaskOutcome::RepeatVisit => {
                tracing::trace!(url = raw_url, outcome = outcome.label(), "Skipped link");
            }
            TaskOutcome::Cancelled | TaskOutcome::BudgetExhausted => {
                tracing::debug!(url = raw_url, outcome = outcome.label(), "Task not admitted");
            }
            TaskOutcome::Expanded { children } => {
                tracing::debug!("Expanded {} into {} links", raw_url, children);
            }
            _ => {
                tracing::warn!("Unable to crawl {}: {}", raw_url, outcome);
            }
        }
    }
}
